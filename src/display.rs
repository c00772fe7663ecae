//! 显示节点边界
//!
//! 场景图本身在引擎外部；这里只定义核心需要的窄接口：
//! 单父节点约束的查询与挂载，以及离屏快照能力。

use serde::{Deserialize, Serialize};

use crate::buffer::PixelWriter;
use crate::color::Color;
use crate::error::Result;

/// 可挂载到场景树的显示节点
///
/// 一个节点同一时刻至多挂载到一个父节点。
pub trait DisplayNode {
    /// 是否已挂载到父节点
    fn has_parent(&self) -> bool;

    /// 挂载到父节点，已挂载时失败
    fn attach(&self) -> Result<()>;

    /// 从父节点卸载
    fn detach(&self);
}

/// 可离屏快照的显示节点
///
/// 快照由渲染线程执行：先以快照参数的填充色准备好目标缓冲区，
/// 再调用 render_into 让节点绘制自身；未绘制区域保持填充色。
pub trait SnapshotSource: DisplayNode + Send + Sync {
    /// 把自身绘制到目标写入器
    fn render_into(&self, writer: &mut PixelWriter<'_>);
}

/// 离屏快照参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotParams {
    /// 目标缓冲区宽度
    pub width: u32,
    /// 目标缓冲区高度
    pub height: u32,
    /// 未绘制区域的填充色
    pub fill: Color,
}
