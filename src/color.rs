//! 颜色定义和转换
//!
//! 每个通道是归一化到 [0, 1] 的浮点值，与像素缓冲区的 8 位存储互相转换。

use serde::{Deserialize, Serialize};

/// RGBA 颜色，通道归一化到 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// 红色通道
    pub r: f32,
    /// 绿色通道
    pub g: f32,
    /// 蓝色通道
    pub b: f32,
    /// 不透明度
    pub a: f32,
}

impl Color {
    /// 完全透明
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// 不透明黑色
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// 不透明白色
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// 创建颜色，通道值夹取到 [0, 1]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// 创建不透明颜色
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// 从 8 位 RGBA 字节创建
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f32 / 255.0,
            g: rgba[1] as f32 / 255.0,
            b: rgba[2] as f32 / 255.0,
            a: rgba[3] as f32 / 255.0,
        }
    }

    /// 转换为 8 位 RGBA 字节（四舍五入）
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    /// 灰度投影 (使用标准亮度公式)，保留不透明度
    pub fn gray(self) -> Color {
        let luma = (299.0 * self.r + 587.0 * self.g + 114.0 * self.b) / 1000.0;
        Color {
            r: luma,
            g: luma,
            b: luma,
            a: self.a,
        }
    }

    /// 逐通道相乘，包括不透明度
    pub fn multiply(self, other: Color) -> Color {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
    }

    /// 检查颜色是否完全透明
    pub fn is_transparent(self) -> bool {
        self.a == 0.0
    }

    /// 检查颜色是否不透明
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// 格式化为十六进制颜色字符串 (如 "#FF0000" 或 "#FF000080" 带alpha)
    pub fn to_hex_string(self, with_alpha: bool) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if with_alpha {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        } else {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "Color(#{:02X}{:02X}{:02X})", r, g, b)
        } else {
            write!(f, "Color(#{:02X}{:02X}{:02X}{:02X})", r, g, b, a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        let color = Color::from_rgba8([255, 128, 64, 32]);
        assert_eq!(color.to_rgba8(), [255, 128, 64, 32]);
    }

    #[test]
    fn test_new_clamps() {
        let color = Color::new(2.0, -1.0, 0.5, 1.5);
        assert_eq!(color, Color::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_gray() {
        // 白色灰度化仍为白色
        assert_eq!(Color::WHITE.gray(), Color::WHITE);

        // 纯红的亮度为 0.299
        let gray = Color::rgb(1.0, 0.0, 0.0).gray();
        assert!((gray.r - 0.299).abs() < 1e-6);
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        assert_eq!(gray.a, 1.0);
    }

    #[test]
    fn test_gray_preserves_alpha() {
        let gray = Color::new(0.2, 0.4, 0.6, 0.25).gray();
        assert_eq!(gray.a, 0.25);
    }

    #[test]
    fn test_multiply() {
        let color = Color::new(1.0, 0.5, 0.0, 0.8);
        let tint = Color::new(0.5, 0.5, 0.5, 0.5);
        let result = color.multiply(tint);
        assert_eq!(result, Color::new(0.5, 0.25, 0.0, 0.4));
    }

    #[test]
    fn test_transparent_check() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::TRANSPARENT.is_opaque());
        assert!(Color::WHITE.is_opaque());
        assert!(!Color::WHITE.is_transparent());
    }

    #[test]
    fn test_format_hex() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        assert_eq!(red.to_hex_string(false), "#FF0000");
        assert_eq!(red.to_hex_string(true), "#FF0000FF");
    }

    #[test]
    fn test_display() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        assert_eq!(format!("{}", red), "Color(#FF0000)");

        let semi = Color::new(1.0, 0.0, 0.0, 128.0 / 255.0);
        assert_eq!(format!("{}", semi), "Color(#FF000080)");
    }
}
