//! Texture Engine - 2D 游戏引擎的位图变换模块
//!
//! 包装可显示的位图纹理，并在加载期或运行期生成精灵变体：
//! - 子区域提取与水平/垂直拼接
//! - 灰度化、漂白、颜色乘法、染色、颜色键透明
//! - 显示节点离屏快照混合（在单一渲染线程上执行）
//! - 动画纹理转换边界
//!
//! 所有像素变换是纯函数：读取源缓冲区，分配新缓冲区返回新纹理，
//! 从不修改源；可以在任意线程运行。只有快照混合需要渲染线程。

#![warn(missing_docs)]

pub mod animation;
pub mod blending;
pub mod buffer;
pub mod color;
pub mod display;
pub mod error;
pub mod ops;
pub mod render;
pub mod texture;

pub use animation::{AnimationBackend, AnimationChannel, FrameLayout};
pub use blending::BlendMode;
pub use buffer::{PixelBuffer, PixelReader, PixelWriter};
pub use color::Color;
pub use display::{DisplayNode, SnapshotParams, SnapshotSource};
pub use error::{Result, TextureError};
pub use texture::{Direction, Region, SharedPixelBuffer, Texture};
