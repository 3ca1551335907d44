//! 徽章区域的渲染树节点

use serde::{Deserialize, Serialize};

use crate::host::ToastPresenter;

/// Toast 提示内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// 文本内容（徽章名称）
    pub content: String,
    /// 图片地址
    pub source: String,
}

/// 点击行为
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressAction {
    OpenToast(Toast),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    Contain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewStyle {
    pub align_items: Alignment,
    pub flex_direction: FlexDirection,
    pub justify_content: Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageStyle {
    pub width: u32,
    pub height: u32,
    pub resize_mode: ResizeMode,
    pub margin_horizontal: u32,
}

/// 渲染树节点
#[derive(Debug, Clone, PartialEq)]
pub enum UiElement {
    View {
        key: Option<String>,
        style: ViewStyle,
        /// 是否由插件注入
        injected: bool,
        children: Vec<UiElement>,
    },
    Pressable {
        on_press: PressAction,
        child: Box<UiElement>,
    },
    Image {
        source: String,
        style: ImageStyle,
    },
    /// 宿主原生节点，插件不关心其内容
    Native { name: String },
}

impl UiElement {
    pub fn native(name: impl Into<String>) -> Self {
        Self::Native { name: name.into() }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Self::View { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn is_injected(&self) -> bool {
        matches!(self, Self::View { injected: true, .. })
    }

    /// 子树中可点击节点的数量
    pub fn pressable_count(&self) -> usize {
        match self {
            Self::View { children, .. } => children.iter().map(Self::pressable_count).sum(),
            Self::Pressable { child, .. } => 1 + child.pressable_count(),
            Self::Image { .. } | Self::Native { .. } => 0,
        }
    }

    /// 子树中第一张图片的地址
    pub fn image_source(&self) -> Option<&str> {
        match self {
            Self::View { children, .. } => children.iter().find_map(Self::image_source),
            Self::Pressable { child, .. } => child.image_source(),
            Self::Image { source, .. } => Some(source),
            Self::Native { .. } => None,
        }
    }

    /// 触发子树中第一个可点击节点，返回是否有节点被触发
    pub fn press(&self, presenter: &dyn ToastPresenter) -> bool {
        match self {
            Self::View { children, .. } => children.iter().any(|c| c.press(presenter)),
            Self::Pressable { on_press, .. } => {
                match on_press {
                    PressAction::OpenToast(toast) => presenter.open(toast.clone()),
                }
                true
            }
            Self::Image { .. } | Self::Native { .. } => false,
        }
    }
}
