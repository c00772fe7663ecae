//! 错误类型定义

use thiserror::Error;

/// 纹理引擎错误类型
#[derive(Error, Debug)]
pub enum TextureError {
    /// 子区域矩形越出源图像范围
    #[error("无效的区域: {0}")]
    InvalidRegion(String),

    /// 混合背景节点已挂载到父节点
    #[error("背景节点已挂载到父节点，无法离屏快照")]
    BackgroundAttached,

    /// 节点已挂载，违反单父节点约束
    #[error("节点已挂载到父节点")]
    AlreadyAttached,

    /// 纹理的像素缓冲区引用已释放
    #[error("纹理已释放")]
    Disposed,

    /// 动画帧数为零或超出图像宽度
    #[error("无效的帧数: {0}")]
    InvalidFrameCount(u32),

    /// 渲染线程已退出，无法提交任务
    #[error("渲染线程已关闭")]
    RenderThreadClosed,
}

/// 引擎统一的 Result 别名
pub type Result<T> = std::result::Result<T, TextureError>;
