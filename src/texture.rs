//! 纹理包装和派生操作
//!
//! Texture 包装一个可共享的像素缓冲区，外加显示尺寸提示，并提供
//! 派生图像操作：子区域提取、拼接、颜色变换、颜色键透明、快照混合。
//! 每个变换分配全新的目标缓冲区并返回全新的 Texture，从不修改源；
//! 只有 set 和 dispose 原地改变缓冲区引用本身。

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationBackend, AnimationChannel, FrameLayout};
use crate::blending::BlendMode;
use crate::buffer::{PixelBuffer, PixelWriter};
use crate::color::Color;
use crate::display::{DisplayNode, SnapshotParams, SnapshotSource};
use crate::error::{Result, TextureError};
use crate::ops;
use crate::render::Renderer;

/// 引用计数共享的像素缓冲区
pub type SharedPixelBuffer = Arc<Mutex<PixelBuffer>>;

/// 拼接方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// 对方在上
    Up,
    /// 对方在下
    Down,
    /// 对方在左
    Left,
    /// 对方在右
    Right,
}

/// 像素坐标下的轴对齐矩形区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// 左边界（含）
    pub min_x: i64,
    /// 上边界（含）
    pub min_y: i64,
    /// 右边界（不含）
    pub max_x: i64,
    /// 下边界（不含）
    pub max_y: i64,
}

impl Region {
    /// 创建区域
    pub fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// 区域宽度
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    /// 区域高度
    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }
}

/// 可显示的位图纹理
///
/// 通过 copy 产生的纹理共享同一个缓冲区引用（最后写入者可见），
/// 挂载状态不随 copy 共享：单父节点约束下，同一位图要同时显示多处
/// 就需要各自独立挂载的别名。
pub struct Texture {
    /// 像素缓冲区引用，None 表示已释放
    image: Option<SharedPixelBuffer>,
    /// 显示宽度提示，由布局系统消费
    fit_width: f32,
    /// 显示高度提示
    fit_height: f32,
    /// 是否已挂载到父节点
    attached: AtomicBool,
}

impl Texture {
    /// 从像素缓冲区创建纹理
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            image: Some(Arc::new(Mutex::new(buffer))),
            fit_width: 0.0,
            fit_height: 0.0,
            attached: AtomicBool::new(false),
        }
    }

    /// 从已解码的图像创建纹理
    pub fn from_image(image: RgbaImage) -> Self {
        Self::new(PixelBuffer::from_image(image))
    }

    /// 取出共享缓冲区引用，已释放时报错
    fn shared(&self) -> Result<&SharedPixelBuffer> {
        self.image.as_ref().ok_or(TextureError::Disposed)
    }

    /// 在共享缓冲区上执行只读回调
    pub fn with_pixels<T>(&self, f: impl FnOnce(&PixelBuffer) -> T) -> Result<T> {
        let shared = self.shared()?;
        let buffer = shared.lock().unwrap();
        Ok(f(&buffer))
    }

    /// 通过像素写入器编辑共享缓冲区
    ///
    /// 写入对共享同一缓冲区的所有别名可见。
    pub fn edit_pixels<T>(&self, f: impl FnOnce(&mut PixelWriter<'_>) -> T) -> Result<T> {
        let shared = self.shared()?;
        let mut buffer = shared.lock().unwrap();
        let mut writer = buffer.writer();
        Ok(f(&mut writer))
    }

    /// 当前图像尺寸
    pub fn size(&self) -> Result<(u32, u32)> {
        self.with_pixels(|buffer| (buffer.width(), buffer.height()))
    }

    /// 纹理是否已释放
    pub fn is_disposed(&self) -> bool {
        self.image.is_none()
    }

    // ------------------------------------------------------------------
    // 派生变换
    // ------------------------------------------------------------------

    /// 提取子区域为新纹理
    ///
    /// 区域越界或翻转时立即报错，不产生任何缓冲区。
    pub fn sub_texture(&self, region: Region) -> Result<Texture> {
        let buffer = self.with_pixels(|src| ops::sub_region(src, region))??;
        Ok(Texture::new(buffer))
    }

    /// 与另一纹理沿指定方向拼接为新纹理
    ///
    /// 水平拼接宽度相加、高度取较大者；垂直拼接对称。尺寸不足的一侧
    /// 用全透明像素补齐，不做拉伸。
    pub fn super_texture(&self, other: &Texture, direction: Direction) -> Result<Texture> {
        let self_shared = self.shared()?;
        let other_shared = other.shared()?;

        // copy 产生的别名共享同一把锁，加锁一次避免重入
        let buffer = if Arc::ptr_eq(self_shared, other_shared) {
            let src = self_shared.lock().unwrap();
            Self::concat(&src, &src, direction)
        } else {
            let this = self_shared.lock().unwrap();
            let that = other_shared.lock().unwrap();
            Self::concat(&this, &that, direction)
        };

        Ok(Texture::new(buffer))
    }

    /// 按方向确定两侧次序后拼接
    fn concat(this: &PixelBuffer, other: &PixelBuffer, direction: Direction) -> PixelBuffer {
        match direction {
            Direction::Left => ops::concat_horizontal(other, this),
            Direction::Right => ops::concat_horizontal(this, other),
            Direction::Up => ops::concat_vertical(other, this),
            Direction::Down => ops::concat_vertical(this, other),
        }
    }

    /// 灰度化为新纹理，保留不透明度
    pub fn to_grayscale(&self) -> Result<Texture> {
        let buffer = self.with_pixels(ops::grayscale)?;
        Ok(Texture::new(buffer))
    }

    /// 漂白为白色剪影：颜色通道置 1，保留不透明度
    pub fn discolor(&self) -> Result<Texture> {
        let buffer = self.with_pixels(ops::discolor)?;
        Ok(Texture::new(buffer))
    }

    /// 逐通道颜色乘法（包括不透明度）为新纹理
    pub fn multiply_color(&self, color: Color) -> Result<Texture> {
        let buffer = self.with_pixels(|src| ops::multiply_color(src, color))?;
        Ok(Texture::new(buffer))
    }

    /// 染色：等价于先漂白再乘以目标颜色
    pub fn to_color(&self, color: Color) -> Result<Texture> {
        let buffer = self.with_pixels(|src| ops::recolor(src, color))?;
        Ok(Texture::new(buffer))
    }

    /// 颜色键透明：与 color 完全相等的像素变为全透明
    pub fn transparent_color(&self, color: Color) -> Result<Texture> {
        let buffer = self.with_pixels(|src| ops::transparent_color(src, color))?;
        Ok(Texture::new(buffer))
    }

    /// 与背景节点的离屏快照按混合模式合成为新纹理
    ///
    /// 背景节点不得已挂载到父节点，违反时在任何分配前报错。快照以
    /// 本纹理的尺寸、全透明填充在渲染线程上执行，调用线程阻塞等待
    /// 缓冲区填充完成。
    pub fn blend(
        &self,
        background: Arc<dyn SnapshotSource>,
        mode: BlendMode,
        renderer: &Renderer,
    ) -> Result<Texture> {
        if background.has_parent() {
            return Err(TextureError::BackgroundAttached);
        }

        let (width, height) = self.size()?;
        let params = SnapshotParams {
            width,
            height,
            fill: Color::TRANSPARENT,
        };

        tracing::debug!("混合快照: {}x{}, 模式 {}", width, height, mode.name());
        let rendered = renderer.snapshot(background, params)?;

        let buffer = self.with_pixels(|src| ops::blend_buffers(src, &rendered, mode))?;
        Ok(Texture::new(buffer))
    }

    // ------------------------------------------------------------------
    // 生命周期
    // ------------------------------------------------------------------

    /// 共享同一像素缓冲区的新纹理
    ///
    /// 不复制像素；尺寸提示随之复制，挂载状态归零。
    pub fn copy(&self) -> Texture {
        Texture {
            image: self.image.clone(),
            fit_width: self.fit_width,
            fit_height: self.fit_height,
            attached: AtomicBool::new(false),
        }
    }

    /// 原地替换为另一纹理的缓冲区引用和尺寸提示
    ///
    /// 别名赋值而非深拷贝：此后两个纹理共享同一缓冲区。
    pub fn set(&mut self, other: &Texture) {
        self.image = other.image.clone();
        self.fit_width = other.fit_width;
        self.fit_height = other.fit_height;
    }

    /// 释放像素缓冲区引用，可重复调用
    pub fn dispose(&mut self) {
        if self.image.take().is_some() {
            tracing::debug!("纹理缓冲区引用已释放");
        }
    }

    /// 显示宽度提示
    pub fn fit_width(&self) -> f32 {
        self.fit_width
    }

    /// 设置显示宽度提示
    pub fn set_fit_width(&mut self, width: f32) {
        self.fit_width = width;
    }

    /// 显示高度提示
    pub fn fit_height(&self) -> f32 {
        self.fit_height
    }

    /// 设置显示高度提示
    pub fn set_fit_height(&mut self, height: f32) {
        self.fit_height = height;
    }

    // ------------------------------------------------------------------
    // 动画子系统边界
    // ------------------------------------------------------------------

    /// 转换为动画纹理：把图像视为横向帧条，按帧数切分
    ///
    /// 单帧宽度为总宽度整除帧数，高度取整幅图像；帧索引范围为
    /// [0, frames - 1]（含两端）。布局连同共享图像交给动画后端。
    pub fn to_animated_texture<B: AnimationBackend>(
        &self,
        backend: &B,
        frames: u32,
        duration: Duration,
    ) -> Result<B::Node> {
        let (width, height) = self.size()?;
        if frames == 0 || frames > width {
            return Err(TextureError::InvalidFrameCount(frames));
        }

        let layout = FrameLayout {
            frames,
            frame_width: width / frames,
            frame_height: height,
            duration,
            first_frame: 0,
            last_frame: frames - 1,
        };

        tracing::debug!(
            "动画转换: {} 帧, 单帧 {}x{}",
            layout.frames,
            layout.frame_width,
            layout.frame_height
        );

        let image = self.shared()?.clone();
        Ok(backend.build(image, layout))
    }

    /// 使用动画通道的帧数与时长转换为动画纹理
    pub fn to_animated_texture_channel<B: AnimationBackend>(
        &self,
        backend: &B,
        channel: &AnimationChannel,
    ) -> Result<B::Node> {
        self.to_animated_texture(backend, channel.frames, channel.duration)
    }
}

impl DisplayNode for Texture {
    fn has_parent(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn attach(&self) -> Result<()> {
        if self.attached.swap(true, Ordering::SeqCst) {
            return Err(TextureError::AlreadyAttached);
        }
        Ok(())
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

impl SnapshotSource for Texture {
    /// 把自身像素绘制到目标写入器，左上角对齐，超出目标的部分裁剪；
    /// 已释放的纹理不绘制任何内容
    fn render_into(&self, writer: &mut PixelWriter<'_>) {
        let Some(shared) = self.image.as_ref() else {
            return;
        };
        let buffer = shared.lock().unwrap();
        let reader = buffer.reader();

        let width = buffer.width().min(writer.width());
        let height = buffer.height().min(writer.height());
        for y in 0..height {
            for x in 0..width {
                writer.set_rgba8(x, y, reader.rgba8_at(x, y));
            }
        }
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size() {
            Ok((width, height)) => write!(
                f,
                "Texture({}x{}, fit {}x{})",
                width, height, self.fit_width, self.fit_height
            ),
            Err(_) => write!(f, "Texture(已释放)"),
        }
    }
}
