//! 像素缓冲区和像素读写器
//!
//! PixelBuffer 是一个可寻址的二维 RGBA 像素网格，底层存储为
//! [`image::RgbaImage`]。对缓冲区的逐像素访问通过读取器/写入器
//! 能力对象进行；坐标越界属于程序错误，直接 panic 而不是返回错误。

use crate::color::Color;
use image::{Rgba, RgbaImage};

/// 二维 RGBA 像素网格
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// 创建全透明缓冲区
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// 创建以指定颜色填充的缓冲区
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(color.to_rgba8())),
        }
    }

    /// 从已解码的图像创建缓冲区
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// 缓冲区宽度
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// 缓冲区高度
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 获取像素读取器
    pub fn reader(&self) -> PixelReader<'_> {
        PixelReader { buffer: self }
    }

    /// 获取像素写入器
    pub fn writer(&mut self) -> PixelWriter<'_> {
        PixelWriter { buffer: self }
    }

    /// 访问底层图像
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// 取出底层图像
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// 像素读取器 - 按坐标读取单个像素
pub struct PixelReader<'a> {
    buffer: &'a PixelBuffer,
}

impl PixelReader<'_> {
    /// 读取 (x, y) 处的颜色
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from_rgba8(self.buffer.image.get_pixel(x, y).0)
    }

    /// 读取 (x, y) 处的原始 RGBA 字节
    pub fn rgba8_at(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.image.get_pixel(x, y).0
    }
}

/// 像素写入器 - 按坐标写入单个像素
pub struct PixelWriter<'a> {
    buffer: &'a mut PixelBuffer,
}

impl PixelWriter<'_> {
    /// 目标缓冲区宽度
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// 目标缓冲区高度
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// 写入 (x, y) 处的颜色
    pub fn set_color(&mut self, x: u32, y: u32, color: Color) {
        self.buffer.image.put_pixel(x, y, Rgba(color.to_rgba8()));
    }

    /// 写入 (x, y) 处的原始 RGBA 字节
    pub fn set_rgba8(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.buffer.image.put_pixel(x, y, Rgba(rgba));
    }
}
