use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_WIDTH: i32 = 500;
pub const DEFAULT_HEIGHT: i32 = 500;
pub const DEFAULT_BLOCK_SIZE: i32 = 10;
/// Cells per axis a field may span.
pub const MAX_CELLS: i32 = 10_000;
/// Five display frames at 60 Hz.
pub const DEFAULT_TICK: Duration = Duration::from_micros(1_000_000 / 60 * 5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    pub build_walls: bool,
    pub tick: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            block_size: DEFAULT_BLOCK_SIZE,
            build_walls: true,
            tick: DEFAULT_TICK,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("block size must be positive, got {0}")]
    BlockSize(i32),
    #[error("{axis} of {value} leaves no room inside a {block}-unit border")]
    TooSmall { axis: &'static str, value: i32, block: i32 },
    #[error("{axis} of {value} spans more than {} cells of {block} units", MAX_CELLS)]
    TooLarge { axis: &'static str, value: i32, block: i32 },
    #[error("{axis} of {value} is not a multiple of the {block}-unit block size")]
    Misaligned { axis: &'static str, value: i32, block: i32 },
    #[error("tick period must be non-zero")]
    ZeroTick,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size <= 0 {
            return Err(ConfigError::BlockSize(self.block_size));
        }

        let block = self.block_size;
        for &(axis, value) in [("width", self.width), ("height", self.height)].iter() {
            // A block too big to double leaves no room for any dimension
            if block.checked_mul(2).map_or(true, |border| value <= border) {
                return Err(ConfigError::TooSmall { axis, value, block });
            }
            if value / block > MAX_CELLS {
                return Err(ConfigError::TooLarge { axis, value, block });
            }
            // Walls sit on the last cell boundary, which the snake must be able to reach
            if value % block != 0 {
                return Err(ConfigError::Misaligned { axis, value, block });
            }
        }

        if self.tick == Duration::from_millis(0) {
            return Err(ConfigError::ZeroTick);
        }

        Ok(())
    }

    /// Playfield size in cells.
    pub fn cells(&self) -> (i32, i32) {
        (self.width / self.block_size, self.height / self.block_size)
    }
}

/// Terminal snake on a cell grid.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Options {
    /// Playfield width in surface units
    #[arg(long)]
    pub width: Option<i32>,

    /// Playfield height in surface units
    #[arg(long)]
    pub height: Option<i32>,

    /// Size of one cell in surface units
    #[arg(long)]
    pub block_size: Option<i32>,

    /// Play without the border walls
    #[arg(long)]
    pub no_walls: bool,

    /// Milliseconds between game steps
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Size the playfield to the terminal, unless width or height is given
    #[arg(long)]
    pub fit: bool,

    /// Write a log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Options {
    /// Builds the game configuration. `terminal_cells` is the number of grid
    /// cells the terminal can show, used with `--fit`.
    pub fn to_config(&self, terminal_cells: Option<(i32, i32)>) -> Result<GameConfig, ConfigError> {
        let defaults = GameConfig::default();
        let block_size = self.block_size.unwrap_or(defaults.block_size);

        let (fit_width, fit_height) = match (self.fit, terminal_cells) {
            (true, Some((cols, rows))) => (
                Some(cols.saturating_mul(block_size)),
                Some(rows.saturating_mul(block_size)),
            ),
            _ => (None, None),
        };

        let config = GameConfig {
            width: self.width.or(fit_width).unwrap_or(defaults.width),
            height: self.height.or(fit_height).unwrap_or(defaults.height),
            block_size,
            build_walls: !self.no_walls,
            tick: self.tick_ms.map(Duration::from_millis).unwrap_or(defaults.tick),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        Options::parse_from(std::iter::once("cell-snake").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_the_classic_board() {
        let config = parse(&[]).to_config(None).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.width, 500);
        assert_eq!(config.height, 500);
        assert_eq!(config.block_size, 10);
        assert!(config.build_walls);
        assert_eq!(config.tick, Duration::from_micros(83_330));
        assert_eq!(config.cells(), (50, 50));
    }

    #[test]
    fn unspecified_options_keep_their_defaults() {
        let config = parse(&["--width", "300", "--no-walls"]).to_config(None).unwrap();
        assert_eq!(config.width, 300);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
        assert!(!config.build_walls);
    }

    #[test]
    fn fit_uses_the_terminal_grid() {
        let config = parse(&["--fit", "--block-size", "20"]).to_config(Some((30, 12))).unwrap();
        assert_eq!((config.width, config.height), (600, 240));

        let explicit = parse(&["--fit", "--height", "400"]).to_config(Some((30, 12))).unwrap();
        assert_eq!((explicit.width, explicit.height), (300, 400));
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let zero_block = GameConfig { block_size: 0, ..GameConfig::default() };
        assert_eq!(zero_block.validate(), Err(ConfigError::BlockSize(0)));

        let narrow = GameConfig { width: 20, ..GameConfig::default() };
        assert_eq!(
            narrow.validate(),
            Err(ConfigError::TooSmall { axis: "width", value: 20, block: 10 })
        );

        let huge_block = GameConfig { block_size: i32::MAX, ..GameConfig::default() };
        assert_eq!(
            huge_block.validate(),
            Err(ConfigError::TooSmall { axis: "width", value: 500, block: i32::MAX })
        );

        let stalled = GameConfig { tick: Duration::from_millis(0), ..GameConfig::default() };
        assert_eq!(stalled.validate(), Err(ConfigError::ZeroTick));
    }

    #[test]
    fn rejects_fields_off_the_block_grid() {
        let wide = GameConfig { width: 505, ..GameConfig::default() };
        assert_eq!(
            wide.validate(),
            Err(ConfigError::Misaligned { axis: "width", value: 505, block: 10 })
        );

        let tall = GameConfig { height: 333, block_size: 20, width: 400, ..GameConfig::default() };
        assert_eq!(
            tall.validate(),
            Err(ConfigError::Misaligned { axis: "height", value: 333, block: 20 })
        );

        let err = parse(&["--width", "505"]).to_config(None).unwrap_err();
        assert_eq!(err, ConfigError::Misaligned { axis: "width", value: 505, block: 10 });
    }

    #[test]
    fn rejects_oversized_fields() {
        let huge = GameConfig { width: 1_000_000, height: 1_000_000, ..GameConfig::default() };
        assert_eq!(
            huge.validate(),
            Err(ConfigError::TooLarge { axis: "width", value: 1_000_000, block: 10 })
        );

        let largest = GameConfig { width: MAX_CELLS * 10, height: MAX_CELLS * 10, ..GameConfig::default() };
        assert_eq!(largest.validate(), Ok(()));

        assert!(parse(&["--fit", "--block-size", "1000000000"]).to_config(Some((200, 60))).is_err());
    }
}
