//! 逐像素图像变换操作
//!
//! 所有操作读取一个或两个源缓冲区，分配新的目标缓冲区逐像素写入，
//! 从不修改源。参数校验在任何分配发生之前完成。

use crate::blending::BlendMode;
use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{Result, TextureError};
use crate::texture::Region;

/// 提取子区域
///
/// 目标像素 (i, j) 等于源像素 (min_x + i, min_y + j)。零面积区域合法。
pub fn sub_region(src: &PixelBuffer, region: Region) -> Result<PixelBuffer> {
    if region.min_x < 0 {
        return Err(TextureError::InvalidRegion(format!(
            "min_x 为负: {}",
            region.min_x
        )));
    }
    if region.min_y < 0 {
        return Err(TextureError::InvalidRegion(format!(
            "min_y 为负: {}",
            region.min_y
        )));
    }
    if region.max_x > src.width() as i64 {
        return Err(TextureError::InvalidRegion(format!(
            "max_x {} 超出源宽度 {}",
            region.max_x,
            src.width()
        )));
    }
    if region.max_y > src.height() as i64 {
        return Err(TextureError::InvalidRegion(format!(
            "max_y {} 超出源高度 {}",
            region.max_y,
            src.height()
        )));
    }
    if region.min_x > region.max_x || region.min_y > region.max_y {
        return Err(TextureError::InvalidRegion(format!(
            "区域翻转: ({}, {}) 到 ({}, {})",
            region.min_x, region.min_y, region.max_x, region.max_y
        )));
    }

    let width = region.width() as u32;
    let height = region.height() as u32;
    let offset_x = region.min_x as u32;
    let offset_y = region.min_y as u32;

    let reader = src.reader();
    let mut out = PixelBuffer::new(width, height);
    let mut writer = out.writer();
    for j in 0..height {
        for i in 0..width {
            writer.set_rgba8(i, j, reader.rgba8_at(offset_x + i, offset_y + j));
        }
    }

    Ok(out)
}

/// 水平拼接，left 在左，right 在右
///
/// 结果宽度为两者之和，高度取较大者；较矮一侧下方保持全透明。
pub fn concat_horizontal(left: &PixelBuffer, right: &PixelBuffer) -> PixelBuffer {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());

    let left_reader = left.reader();
    let right_reader = right.reader();

    // 新缓冲区初始为全透明，矮侧的空余区域不再写入
    let mut out = PixelBuffer::new(width, height);
    let mut writer = out.writer();
    for y in 0..height {
        for x in 0..width {
            if x < left.width() {
                if y < left.height() {
                    writer.set_rgba8(x, y, left_reader.rgba8_at(x, y));
                }
            } else if y < right.height() {
                writer.set_rgba8(x, y, right_reader.rgba8_at(x - left.width(), y));
            }
        }
    }

    out
}

/// 垂直拼接，top 在上，bottom 在下
///
/// 结果高度为两者之和，宽度取较大者；较窄一侧的空余区域保持全透明。
pub fn concat_vertical(top: &PixelBuffer, bottom: &PixelBuffer) -> PixelBuffer {
    let width = top.width().max(bottom.width());
    let height = top.height() + bottom.height();

    let top_reader = top.reader();
    let bottom_reader = bottom.reader();

    let mut out = PixelBuffer::new(width, height);
    let mut writer = out.writer();
    for y in 0..height {
        for x in 0..width {
            if y < top.height() {
                if x < top.width() {
                    writer.set_rgba8(x, y, top_reader.rgba8_at(x, y));
                }
            } else if x < bottom.width() {
                writer.set_rgba8(x, y, bottom_reader.rgba8_at(x, y - top.height()));
            }
        }
    }

    out
}

/// 对每个像素套用颜色映射函数，产出同尺寸的新缓冲区
fn map_pixels<F>(src: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(Color) -> Color,
{
    let reader = src.reader();
    let mut out = PixelBuffer::new(src.width(), src.height());
    let mut writer = out.writer();
    for y in 0..src.height() {
        for x in 0..src.width() {
            writer.set_color(x, y, f(reader.color_at(x, y)));
        }
    }

    out
}

/// 灰度化，保留不透明度
pub fn grayscale(src: &PixelBuffer) -> PixelBuffer {
    map_pixels(src, Color::gray)
}

/// 漂白为纯白剪影：颜色通道置 1，保留不透明度
pub fn discolor(src: &PixelBuffer) -> PixelBuffer {
    map_pixels(src, |color| Color::new(1.0, 1.0, 1.0, color.a))
}

/// 逐通道颜色乘法，包括不透明度
pub fn multiply_color(src: &PixelBuffer, color: Color) -> PixelBuffer {
    map_pixels(src, |pixel| pixel.multiply(color))
}

/// 染色：先漂白成白色剪影，再乘以目标颜色
///
/// 中间剪影缓冲区是函数内的局部值，任何返回路径上都会释放。
pub fn recolor(src: &PixelBuffer, color: Color) -> PixelBuffer {
    let silhouette = discolor(src);
    multiply_color(&silhouette, color)
}

/// 颜色键透明：与 color 四通道完全相等的像素变为全透明，其余原样通过
pub fn transparent_color(src: &PixelBuffer, color: Color) -> PixelBuffer {
    let key = color.to_rgba8();

    let reader = src.reader();
    let mut out = PixelBuffer::new(src.width(), src.height());
    let mut writer = out.writer();
    for y in 0..src.height() {
        for x in 0..src.width() {
            let pixel = reader.rgba8_at(x, y);
            if pixel == key {
                writer.set_rgba8(x, y, [0, 0, 0, 0]);
            } else {
                writer.set_rgba8(x, y, pixel);
            }
        }
    }

    out
}

/// 按混合模式逐像素合成两个同尺寸缓冲区，top 为顶层
///
/// 两个缓冲区必须同尺寸（背景按顶层尺寸离屏渲染后传入）。
pub fn blend_buffers(top: &PixelBuffer, bottom: &PixelBuffer, mode: BlendMode) -> PixelBuffer {
    let top_reader = top.reader();
    let bottom_reader = bottom.reader();

    let mut out = PixelBuffer::new(top.width(), top.height());
    let mut writer = out.writer();
    for y in 0..top.height() {
        for x in 0..top.width() {
            let blended = mode.blend(top_reader.color_at(x, y), bottom_reader.color_at(x, y));
            writer.set_color(x, y, blended);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 生成按坐标编码像素值的测试缓冲区
    fn numbered(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        let mut writer = buffer.writer();
        for y in 0..height {
            for x in 0..width {
                writer.set_rgba8(x, y, [x as u8, y as u8, 7, 255]);
            }
        }
        buffer
    }

    const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };

    #[test]
    fn test_sub_region_contents() {
        let src = numbered(4, 3);
        let region = Region::new(1, 1, 3, 3);
        let out = sub_region(&src, region).unwrap();

        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 2);
        let reader = out.reader();
        for j in 0..2u32 {
            for i in 0..2u32 {
                assert_eq!(reader.rgba8_at(i, j), [(1 + i) as u8, (1 + j) as u8, 7, 255]);
            }
        }
    }

    #[test]
    fn test_sub_region_full() {
        let src = numbered(4, 3);
        let out = sub_region(&src, Region::new(0, 0, 4, 3)).unwrap();
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 3);
        assert_eq!(out.reader().rgba8_at(3, 2), [3, 2, 7, 255]);
    }

    #[test]
    fn test_sub_region_zero_area() {
        // 退化但合法
        let src = numbered(4, 3);
        let out = sub_region(&src, Region::new(2, 2, 2, 2)).unwrap();
        assert_eq!(out.width(), 0);
        assert_eq!(out.height(), 0);
    }

    #[test]
    fn test_sub_region_out_of_bounds() {
        let src = numbered(4, 3);

        for region in [
            Region::new(-1, 0, 4, 3),
            Region::new(0, -1, 4, 3),
            Region::new(0, 0, 5, 3),
            Region::new(0, 0, 4, 4),
        ] {
            let result = sub_region(&src, region);
            assert!(matches!(result, Err(TextureError::InvalidRegion(_))));
        }
    }

    #[test]
    fn test_sub_region_inverted() {
        let src = numbered(4, 3);
        let result = sub_region(&src, Region::new(3, 0, 1, 3));
        assert!(matches!(result, Err(TextureError::InvalidRegion(_))));
    }

    #[test]
    fn test_concat_horizontal_red_blue() {
        let a = PixelBuffer::filled(2, 2, RED);
        let b = PixelBuffer::filled(3, 2, BLUE);

        let out = concat_horizontal(&a, &b);
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 2);

        let reader = out.reader();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(reader.rgba8_at(x, y), [255, 0, 0, 255]);
            }
            for x in 2..5 {
                assert_eq!(reader.rgba8_at(x, y), [0, 0, 255, 255]);
            }
        }
    }

    #[test]
    fn test_concat_horizontal_swapped() {
        let a = PixelBuffer::filled(2, 2, RED);
        let b = PixelBuffer::filled(3, 2, BLUE);

        // b 在左时蓝色占据 0..3 列
        let out = concat_horizontal(&b, &a);
        let reader = out.reader();
        assert_eq!(reader.rgba8_at(0, 0), [0, 0, 255, 255]);
        assert_eq!(reader.rgba8_at(3, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_concat_horizontal_letterbox() {
        // 高度不同时，矮侧下方补全透明
        let short = PixelBuffer::filled(2, 1, RED);
        let tall = PixelBuffer::filled(2, 3, BLUE);

        let out = concat_horizontal(&short, &tall);
        assert_eq!(out.height(), 3);

        let reader = out.reader();
        assert_eq!(reader.rgba8_at(0, 0), [255, 0, 0, 255]);
        assert_eq!(reader.rgba8_at(0, 1), [0, 0, 0, 0]);
        assert_eq!(reader.rgba8_at(0, 2), [0, 0, 0, 0]);
        assert_eq!(reader.rgba8_at(2, 2), [0, 0, 255, 255]);
    }

    #[test]
    fn test_concat_vertical_padding() {
        // 宽度不同时，窄侧右边补全透明，不拉伸
        let narrow = PixelBuffer::filled(2, 2, RED);
        let wide = PixelBuffer::filled(3, 2, BLUE);

        let out = concat_vertical(&narrow, &wide);
        assert_eq!(out.width(), 3);
        assert_eq!(out.height(), 4);

        let reader = out.reader();
        assert_eq!(reader.rgba8_at(0, 0), [255, 0, 0, 255]);
        assert_eq!(reader.rgba8_at(2, 0), [0, 0, 0, 0]);
        assert_eq!(reader.rgba8_at(2, 1), [0, 0, 0, 0]);
        assert_eq!(reader.rgba8_at(2, 2), [0, 0, 255, 255]);
    }

    #[test]
    fn test_grayscale_idempotent() {
        let src = numbered(3, 2);
        let once = grayscale(&src);
        let twice = grayscale(&once);

        // 已是灰色的像素再次灰度化映射到自身
        let once_reader = once.reader();
        let twice_reader = twice.reader();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(once_reader.rgba8_at(x, y), twice_reader.rgba8_at(x, y));
            }
        }
    }

    #[test]
    fn test_discolor() {
        let mut src = PixelBuffer::new(2, 1);
        src.writer().set_rgba8(0, 0, [10, 200, 30, 128]);
        src.writer().set_rgba8(1, 0, [255, 0, 0, 255]);

        let out = discolor(&src);
        let reader = out.reader();
        assert_eq!(reader.rgba8_at(0, 0), [255, 255, 255, 128]);
        assert_eq!(reader.rgba8_at(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_multiply_color_scales_alpha() {
        let src = PixelBuffer::filled(1, 1, Color::WHITE);
        let out = multiply_color(&src, Color::new(1.0, 0.5, 0.0, 0.5));
        assert_eq!(out.reader().rgba8_at(0, 0), [255, 128, 0, 128]);
    }

    #[test]
    fn test_recolor_equals_multiply_on_white() {
        // 不透明白色源上，染色与颜色乘法等价
        let src = PixelBuffer::filled(2, 2, Color::WHITE);
        let tint = Color::new(0.2, 0.4, 0.8, 1.0);

        let recolored = recolor(&src, tint);
        let multiplied = multiply_color(&src, tint);

        let a = recolored.reader();
        let b = multiplied.reader();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(a.rgba8_at(x, y), b.rgba8_at(x, y));
            }
        }
    }

    #[test]
    fn test_recolor_tints_silhouette() {
        let mut src = PixelBuffer::new(1, 1);
        src.writer().set_rgba8(0, 0, [3, 9, 27, 128]);

        // 原始颜色被丢弃，只保留 alpha 剪影
        let out = recolor(&src, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(out.reader().rgba8_at(0, 0), [255, 0, 0, 128]);
    }

    #[test]
    fn test_transparent_color() {
        let key = Color::rgb(1.0, 0.0, 0.0);
        let mut src = PixelBuffer::new(3, 1);
        src.writer().set_rgba8(0, 0, [255, 0, 0, 255]);
        // 颜色相同但 alpha 不同，不匹配
        src.writer().set_rgba8(1, 0, [255, 0, 0, 128]);
        src.writer().set_rgba8(2, 0, [0, 255, 0, 200]);

        let out = transparent_color(&src, key);
        let reader = out.reader();
        assert_eq!(reader.rgba8_at(0, 0), [0, 0, 0, 0]);
        assert_eq!(reader.rgba8_at(1, 0), [255, 0, 0, 128]);
        assert_eq!(reader.rgba8_at(2, 0), [0, 255, 0, 200]);
    }

    #[test]
    fn test_blend_buffers_multiply() {
        let top = PixelBuffer::filled(2, 2, Color::new(0.5, 1.0, 0.0, 1.0));
        let bottom = PixelBuffer::filled(2, 2, Color::new(0.5, 0.5, 1.0, 1.0));

        let out = blend_buffers(&top, &bottom, BlendMode::Multiply);
        assert_eq!(out.reader().rgba8_at(0, 0), [64, 128, 0, 255]);
    }

    #[test]
    fn test_sources_unchanged() {
        let src = numbered(3, 3);
        let _ = grayscale(&src);
        let _ = sub_region(&src, Region::new(0, 0, 2, 2)).unwrap();

        // 变换从不修改源
        assert_eq!(src.reader().rgba8_at(2, 2), [2, 2, 7, 255]);
    }
}
