//! 徽章展示适配
//!
//! 把解析出的徽章转换成宿主可渲染的节点：一个行容器包住一张可点击的 24x24 图片，
//! 点击后弹出带徽章名称和图片的 Toast。没有图片地址的徽章不渲染。

mod element;

pub use element::{
    Alignment, FlexDirection, ImageStyle, PressAction, ResizeMode, Toast, UiElement, ViewStyle,
};

use crate::models::BadgeDetails;

/// 徽章图标边长
pub const ICON_SIZE: u32 = 24;
/// 图标水平外边距
pub const ICON_MARGIN: u32 = 2;

const ROW_STYLE: ViewStyle = ViewStyle {
    align_items: Alignment::Center,
    flex_direction: FlexDirection::Row,
    justify_content: Alignment::End,
};

const ICON_STYLE: ImageStyle = ImageStyle {
    width: ICON_SIZE,
    height: ICON_SIZE,
    resize_mode: ResizeMode::Contain,
    margin_horizontal: ICON_MARGIN,
};

/// 渲染单个徽章
pub fn render_badge(badge: &BadgeDetails) -> Option<UiElement> {
    if !badge.has_image() {
        return None;
    }

    let icon = UiElement::Pressable {
        on_press: PressAction::OpenToast(Toast {
            content: badge.name.clone(),
            source: badge.url.clone(),
        }),
        child: Box::new(UiElement::Image {
            source: badge.url.clone(),
            style: ICON_STYLE,
        }),
    };

    Some(UiElement::View {
        key: Some(badge.id.clone()),
        style: ROW_STYLE,
        injected: true,
        children: vec![icon],
    })
}

/// 渲染一组徽章，跳过没有图片的条目，保持输入顺序
pub fn render_badges(badges: &[BadgeDetails]) -> Vec<UiElement> {
    badges.iter().filter_map(render_badge).collect()
}
