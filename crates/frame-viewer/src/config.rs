use crate::presets::CameraView;
use clap::Parser;

/// Public PandaSet challenge frames.
pub const DEFAULT_FRAME_URL: &str =
    "https://static.scale.com/uploads/pandaset-challenge/frame_{frame}.json";

/// `frame-viewer` - plays back recorded LiDAR frames with their labelled cuboids.
///
/// Frames are fetched one at a time from a remote endpoint as the timeline
/// moves. Space plays/pauses, the arrow keys step, Escape quits.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// URL template for a frame's JSON.
    ///
    /// `{frame}` is replaced by the frame index, zero-padded to two digits.
    #[arg(long, env = "FRAME_URL_TEMPLATE", default_value = DEFAULT_FRAME_URL)]
    pub frame_url: String,

    /// Number of frames on the timeline.
    #[arg(long, env = "TOTAL_FRAMES", default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    pub total_frames: u32,

    /// Camera preset selected at startup.
    #[arg(long, value_enum, default_value_t = CameraView::Default)]
    pub view: CameraView,

    /// Initial playback speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    pub speed: f32,

    /// Point sprite diameter in world units.
    #[arg(long, default_value_t = 0.05)]
    pub point_size: f32,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_url: DEFAULT_FRAME_URL.to_owned(),
            total_frames: 50,
            view: CameraView::Default,
            speed: 1.0,
            point_size: 0.05,
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parsed_defaults() {
        let parsed = Config::try_parse_from(["frame-viewer"]).unwrap();
        let d = Config::default();
        assert_eq!(parsed.total_frames, d.total_frames);
        assert_eq!(parsed.view, d.view);
        assert_eq!(parsed.speed, d.speed);
        assert_eq!(parsed.point_size, d.point_size);
        assert_eq!((parsed.width, parsed.height), (d.width, d.height));
    }

    #[test]
    fn parses_overrides() {
        let cfg = Config::try_parse_from([
            "frame-viewer",
            "--frame-url",
            "http://localhost:8000/f_{frame}.json",
            "--total-frames",
            "12",
            "--view",
            "isometric",
            "--speed",
            "2",
        ])
        .unwrap();
        assert_eq!(cfg.frame_url, "http://localhost:8000/f_{frame}.json");
        assert_eq!(cfg.total_frames, 12);
        assert_eq!(cfg.view, CameraView::Isometric);
        assert_eq!(cfg.speed, 2.0);
    }

    #[test]
    fn rejects_empty_timeline() {
        assert!(Config::try_parse_from(["frame-viewer", "--total-frames", "0"]).is_err());
    }
}
