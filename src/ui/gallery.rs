// SPDX-License-Identifier: MPL-2.0
//! The gallery: one card per stored record, or the empty-state placeholder.
//!
//! The view is derived entirely from the store's record sequence, in array
//! order (oldest-appended first), so the rendered card set always matches
//! the persisted collection. Cards show the record's metadata and wire the
//! Play/Pause/Stop/Delete controls; the active card's media area displays
//! the decoder's latest frame.

use crate::domain::video::{format_upload_date, RecordId, VideoRecord};
use crate::i18n::fluent::I18n;
use crate::playback::Player;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::icons;
use crate::ui::styles;
use iced::widget::scrollable::RelativeOffset;
use iced::widget::space::horizontal as horizontal_space;
use iced::widget::{button, image, scrollable, Column, Container, Id, Row, Text};
use iced::{alignment, Color, Element, Length};

/// Identifier of the gallery scrollable, targeted by scroll-to-card tasks.
pub const SCROLLABLE_ID: &str = "gallery-scrollable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Open the native file picker.
    BrowseClicked,
    /// Scroll the card into view and start playback after the settle delay.
    PlayClicked(RecordId),
    /// Pause or resume the active playback session.
    PauseToggled,
    /// End the active playback session.
    StopClicked,
    /// Ask for confirmation before deleting the record.
    DeleteClicked(RecordId),
}

/// Context required to render the gallery.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub records: &'a [VideoRecord],
    pub player: &'a Player,
}

/// Scroll progress that brings the card at `index` of `len` into view:
/// the first card snaps to the top, the last to the bottom, the rest
/// proportionally in between.
#[must_use]
pub fn scroll_progress_for(index: usize, len: usize) -> RelativeOffset {
    let y = if len > 1 {
        index as f32 / (len - 1) as f32
    } else {
        0.0
    };
    RelativeOffset { x: 0.0, y }
}

/// Renders the gallery: header plus the card list, or the empty state.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let content: Element<'_, Message> = if ctx.records.is_empty() {
        empty_state(ctx.i18n)
    } else {
        card_list(&ctx)
    };

    Column::new()
        .push(header(ctx.i18n, ctx.records.len()))
        .push(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Top bar: app title, record count, and the add button.
fn header(i18n: &I18n, count: usize) -> Element<'_, Message> {
    let title = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(icons::sized(icons::tinted(icons::film()), sizing::ICON_MD))
        .push(Text::new(i18n.tr("window-title")).size(typography::TITLE_MD));

    let count_label = Text::new(i18n.tr_with_count("header-count", count))
        .size(typography::CAPTION)
        .color(palette::GRAY_400);

    let add_button = button(
        Row::new()
            .spacing(spacing::XS)
            .align_y(alignment::Vertical::Center)
            .push(icons::sized(
                icons::colored(icons::folder_open(), palette::WHITE),
                sizing::ICON_SM,
            ))
            .push(Text::new(i18n.tr("header-add-button"))),
    )
    .padding([spacing::XS, spacing::MD])
    .style(styles::button::primary)
    .on_press(Message::BrowseClicked);

    Container::new(
        Row::new()
            .spacing(spacing::MD)
            .align_y(alignment::Vertical::Center)
            .push(title)
            .push(count_label)
            .push(horizontal_space())
            .push(add_button),
    )
    .width(Length::Fill)
    .padding(spacing::MD)
    .into()
}

/// Placeholder shown when the collection has zero records.
fn empty_state(i18n: &I18n) -> Element<'_, Message> {
    let icon = icons::sized(
        icons::colored(icons::film(), palette::GRAY_400),
        sizing::ICON_XL * 2.0,
    );

    let title = Text::new(i18n.tr("empty-state-title"))
        .size(typography::TITLE_LG)
        .color(palette::GRAY_400);

    let subtitle = Text::new(i18n.tr("empty-state-subtitle"))
        .size(typography::BODY)
        .color(palette::GRAY_400);

    let button_content = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(icons::sized(
            icons::colored(icons::folder_open(), palette::WHITE),
            sizing::ICON_SM,
        ))
        .push(Text::new(i18n.tr("empty-state-button")));

    let browse_button = button(button_content)
        .padding([spacing::SM, spacing::LG])
        .style(styles::button::primary)
        .on_press(Message::BrowseClicked);

    let drop_hint = Text::new(i18n.tr("empty-state-drop-hint"))
        .size(typography::CAPTION)
        .color(Color {
            a: 0.5,
            ..palette::GRAY_400
        });

    let content = Column::new()
        .spacing(spacing::LG)
        .align_x(alignment::Horizontal::Center)
        .push(icon)
        .push(title)
        .push(subtitle)
        .push(browse_button)
        .push(drop_hint);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
}

/// Scrollable column of cards, oldest-appended first.
fn card_list<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let cards = ctx
        .records
        .iter()
        .map(|record| card(record, ctx.player, ctx.i18n));

    let column = Column::with_children(cards)
        .spacing(spacing::LG)
        .padding(spacing::MD)
        .align_x(alignment::Horizontal::Center)
        .width(Length::Fill);

    scrollable(column)
        .id(Id::new(SCROLLABLE_ID))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// One gallery card: media area, metadata, and action controls.
fn card<'a>(record: &'a VideoRecord, player: &'a Player, i18n: &'a I18n) -> Element<'a, Message> {
    let is_active = player.is_active(&record.id);

    let media: Element<'a, Message> = match (is_active, player.frame()) {
        (true, Some(frame)) => image(frame.clone())
            .width(Length::Fill)
            .height(Length::Fixed(sizing::CARD_MEDIA_HEIGHT))
            .into(),
        (true, None) => Text::new(i18n.tr("card-playing"))
            .size(typography::BODY)
            .color(palette::GRAY_200)
            .into(),
        (false, _) => icons::sized(
            icons::colored(icons::film(), palette::GRAY_700),
            sizing::ICON_XL,
        )
        .into(),
    };

    let media_area = Container::new(media)
        .width(Length::Fill)
        .height(Length::Fixed(sizing::CARD_MEDIA_HEIGHT))
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(styles::container::media);

    let title = Text::new(&record.name).size(typography::TITLE_SM);

    let caption = Row::new()
        .spacing(spacing::SM)
        .push(
            Text::new(&record.size)
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        )
        .push(
            Text::new(format_upload_date(&record.upload_date))
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );

    Container::new(
        Column::new()
            .spacing(spacing::SM)
            .push(media_area)
            .push(title)
            .push(caption)
            .push(controls(record, player, i18n, is_active)),
    )
    .width(Length::Fixed(sizing::CARD_WIDTH))
    .padding(spacing::MD)
    .style(styles::container::card)
    .into()
}

/// Action row of one card. Play/Delete when idle; pause/stop controls while
/// the record is the active playback session.
fn controls<'a>(
    record: &'a VideoRecord,
    player: &'a Player,
    i18n: &'a I18n,
    is_active: bool,
) -> Element<'a, Message> {
    let delete_button = button(
        Row::new()
            .spacing(spacing::XS)
            .align_y(alignment::Vertical::Center)
            .push(icons::sized(
                icons::colored(icons::trash(), palette::WHITE),
                sizing::ICON_SM,
            ))
            .push(Text::new(i18n.tr("card-delete"))),
    )
    .padding([spacing::XS, spacing::MD])
    .style(styles::button::danger)
    .on_press(Message::DeleteClicked(record.id.clone()));

    let mut row = Row::new().spacing(spacing::SM);

    if is_active {
        let (pause_icon, pause_label) = if player.is_paused() {
            (icons::play(), i18n.tr("card-resume"))
        } else {
            (icons::pause(), i18n.tr("card-pause"))
        };

        let pause_button = button(
            Row::new()
                .spacing(spacing::XS)
                .align_y(alignment::Vertical::Center)
                .push(icons::sized(icons::tinted(pause_icon), sizing::ICON_SM))
                .push(Text::new(pause_label)),
        )
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::secondary)
        .on_press(Message::PauseToggled);

        let stop_button = button(
            Row::new()
                .spacing(spacing::XS)
                .align_y(alignment::Vertical::Center)
                .push(icons::sized(icons::tinted(icons::stop()), sizing::ICON_SM))
                .push(Text::new(i18n.tr("card-stop"))),
        )
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::secondary)
        .on_press(Message::StopClicked);

        row = row.push(pause_button).push(stop_button);
    } else {
        let play_button = button(
            Row::new()
                .spacing(spacing::XS)
                .align_y(alignment::Vertical::Center)
                .push(icons::sized(
                    icons::colored(icons::play(), palette::WHITE),
                    sizing::ICON_SM,
                ))
                .push(Text::new(i18n.tr("card-play"))),
        )
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::primary)
        .on_press(Message::PlayClicked(record.id.clone()));

        row = row.push(play_button);
    }

    row.push(horizontal_space()).push(delete_button).into()
}
