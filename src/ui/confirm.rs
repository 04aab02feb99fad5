// SPDX-License-Identifier: MPL-2.0
//! Blocking confirmation dialog for record deletion.
//!
//! Deletion is the only destructive action in the application, so it sits
//! behind this modal. While a [`PendingDelete`] is set the dialog covers the
//! whole window; every other control is unreachable until the user confirms
//! or cancels.

use crate::domain::video::RecordId;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::icons;
use crate::ui::styles;
use iced::widget::{button, Column, Container, Row, Text};
use iced::{alignment, Element, Length};

/// The deletion awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: RecordId,
    /// Original filename, shown in the dialog body.
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The user confirmed; the record transitions to deleted.
    Confirmed,
    /// The user declined; nothing changes.
    Cancelled,
}

/// Renders the modal over a dimmed backdrop.
pub fn view<'a>(pending: &'a PendingDelete, i18n: &'a I18n) -> Element<'a, Message> {
    let icon = icons::sized(icons::tinted(icons::warning()), sizing::ICON_LG);

    let title = Text::new(i18n.tr("confirm-delete-title")).size(typography::TITLE_MD);

    let body = Text::new(i18n.tr_with_args("confirm-delete-body", &[("name", &pending.name)]))
        .size(typography::BODY);

    let cancel_button = button(Text::new(i18n.tr("confirm-delete-cancel")))
        .padding([spacing::XS, spacing::LG])
        .style(styles::button::secondary)
        .on_press(Message::Cancelled);

    let delete_button = button(Text::new(i18n.tr("confirm-delete-confirm")))
        .padding([spacing::XS, spacing::LG])
        .style(styles::button::danger)
        .on_press(Message::Confirmed);

    let buttons = Row::new()
        .spacing(spacing::SM)
        .push(cancel_button)
        .push(delete_button);

    let dialog = Container::new(
        Column::new()
            .spacing(spacing::MD)
            .align_x(alignment::Horizontal::Center)
            .push(icon)
            .push(title)
            .push(body)
            .push(buttons),
    )
    .width(Length::Fixed(sizing::DIALOG_WIDTH))
    .padding(spacing::LG)
    .style(styles::container::dialog);

    Container::new(dialog)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(styles::container::backdrop)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_delete_keeps_id_and_name() {
        let pending = PendingDelete {
            id: RecordId::from("1-a"),
            name: "clip.mp4".into(),
        };
        assert_eq!(pending.id, RecordId::from("1-a"));
        assert_eq!(pending.name, "clip.mp4");
    }

    #[test]
    fn view_builds_for_any_record() {
        let pending = PendingDelete {
            id: RecordId::from("1-a"),
            name: "holiday.webm".into(),
        };
        let _ = view(&pending, &I18n::default());
    }
}
