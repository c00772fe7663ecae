//! 动画子系统边界
//!
//! 动画播放（计时、帧推进、循环）由外部动画子系统负责。这里只定义
//! 转换时交给后端的帧布局元数据与后端接口，后端产出的动画节点对
//! 本引擎是不透明的。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::texture::SharedPixelBuffer;

/// 横向帧条的切分布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// 帧数
    pub frames: u32,
    /// 单帧宽度（总宽度整除帧数）
    pub frame_width: u32,
    /// 单帧高度（整幅图像高度）
    pub frame_height: u32,
    /// 动画总时长
    pub duration: Duration,
    /// 起始帧索引（含）
    pub first_frame: u32,
    /// 结束帧索引（含）
    pub last_frame: u32,
}

/// 动画通道：预定义的帧数与总时长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationChannel {
    /// 帧数
    pub frames: u32,
    /// 动画总时长
    pub duration: Duration,
}

/// 动画后端接口
pub trait AnimationBackend {
    /// 后端产出的动画显示节点类型
    type Node;

    /// 用共享图像和帧布局构建动画节点
    fn build(&self, image: SharedPixelBuffer, layout: FrameLayout) -> Self::Node;
}
