//! 混合模式定义
//!
//! 每种混合模式是一个命名的逐通道合成函数，把顶层（本纹理）和
//! 底层（离屏渲染的背景）两个颜色样本合成为一个。除 SrcOver 外，
//! 各模式对颜色通道套用自己的函数，不透明度统一按 over 合成。

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 命名混合模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// 标准 alpha 合成，顶层覆盖底层
    SrcOver,
    /// 加法
    Add,
    /// 底层减去顶层
    Subtract,
    /// 正片叠底
    Multiply,
    /// 滤色
    Screen,
    /// 叠加（以底层为基准）
    Overlay,
    /// 变暗（取较小值）
    Darken,
    /// 变亮（取较大值）
    Lighten,
    /// 差值
    Difference,
}

impl BlendMode {
    /// 模式名称
    pub fn name(&self) -> &str {
        match self {
            BlendMode::SrcOver => "src_over",
            BlendMode::Add => "add",
            BlendMode::Subtract => "subtract",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::Difference => "difference",
        }
    }

    /// 合成两个颜色样本，top 为顶层（本纹理），bottom 为底层（背景）
    pub fn blend(&self, top: Color, bottom: Color) -> Color {
        match self {
            BlendMode::SrcOver => src_over(top, bottom),
            BlendMode::Add => map_each(top, bottom, |s, d| s + d),
            BlendMode::Subtract => map_each(top, bottom, |s, d| d - s),
            BlendMode::Multiply => map_each(top, bottom, |s, d| s * d),
            BlendMode::Screen => map_each(top, bottom, |s, d| 1.0 - (1.0 - s) * (1.0 - d)),
            BlendMode::Overlay => map_each(top, bottom, |s, d| {
                if d <= 0.5 {
                    2.0 * s * d
                } else {
                    1.0 - 2.0 * (1.0 - s) * (1.0 - d)
                }
            }),
            BlendMode::Darken => map_each(top, bottom, f32::min),
            BlendMode::Lighten => map_each(top, bottom, f32::max),
            BlendMode::Difference => map_each(top, bottom, |s, d| (s - d).abs()),
        }
    }
}

/// 对颜色通道逐个套用合成函数，不透明度按 over 合成
fn map_each<F>(top: Color, bottom: Color, rgb_fn: F) -> Color
where
    F: Fn(f32, f32) -> f32,
{
    Color::new(
        rgb_fn(top.r, bottom.r),
        rgb_fn(top.g, bottom.g),
        rgb_fn(top.b, bottom.b),
        over_alpha(top.a, bottom.a),
    )
}

/// over 合成后的不透明度
fn over_alpha(top_a: f32, bottom_a: f32) -> f32 {
    top_a + bottom_a * (1.0 - top_a)
}

/// 标准 alpha 合成（非预乘）
fn src_over(top: Color, bottom: Color) -> Color {
    let a = over_alpha(top.a, bottom.a);
    if a == 0.0 {
        return Color::TRANSPARENT;
    }

    let weight = bottom.a * (1.0 - top.a);
    Color::new(
        (top.r * top.a + bottom.r * weight) / a,
        (top.g * top.a + bottom.g * weight) / a,
        (top.b * top.a + bottom.b * weight) / a,
        a,
    )
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "src_over" => Ok(BlendMode::SrcOver),
            "add" => Ok(BlendMode::Add),
            "subtract" => Ok(BlendMode::Subtract),
            "multiply" => Ok(BlendMode::Multiply),
            "screen" => Ok(BlendMode::Screen),
            "overlay" => Ok(BlendMode::Overlay),
            "darken" => Ok(BlendMode::Darken),
            "lighten" => Ok(BlendMode::Lighten),
            "difference" => Ok(BlendMode::Difference),
            _ => Err(format!("不支持的混合模式: {name}")),
        }
    }
}
