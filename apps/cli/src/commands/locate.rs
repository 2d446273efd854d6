//! `locate` 子命令：在静态图像上离线运行视觉流水线
//!
//! 赛前标定的常规流程：对着一批球场照片跑流水线，核对颜色
//! 区间和半径带是否命中。

use super::load_config;
use anyhow::{Context, Result};
use clap::Args;
use orchard_protocol::Frame;
use orchard_vision::locate;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LocateCommand {
    /// 图像文件（png/jpeg）
    image: PathBuf,

    /// 配置文件路径（取其 [vision] 段）
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LocateCommand {
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let frame = load_frame(&self.image)
            .with_context(|| format!("failed to load image {}", self.image.display()))?;

        match locate(&frame, &config.vision) {
            Some(result) => {
                println!(
                    "target: color={} heading={} distance={}",
                    result.color, result.heading, result.distance
                );
            }
            None => println!("no detection"),
        }
        Ok(())
    }
}

/// 解码图像为 BGR 帧
fn load_frame(path: &std::path::Path) -> Result<Frame> {
    let rgb = image::open(path)?.to_rgb8();
    let mut frame = Frame::new(rgb.width(), rgb.height());
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        frame.set_pixel(x, y, [b, g, r]);
    }
    Ok(frame)
}
