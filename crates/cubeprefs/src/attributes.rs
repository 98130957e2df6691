use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{InterpolateFn, PrefsError};

const ATTRIBUTES_FILE_FORMAT: config::FileFormat = config::FileFormat::Yaml;
const DEFAULT_ATTRIBUTES_STR: &str = include_str!("default.yaml");
/// Prefix of environment variables that override attributes, such as
/// `CUBE_TWIST_DURATION`.
pub const ENV_PREFIX: &str = "CUBE";

/// Number of entries in [`CubeAttributes::part_explosion`], one per part.
pub const PART_COUNT: usize = 9;

lazy_static! {
    /// Built-in attributes, loaded the same way as user attributes.
    pub static ref DEFAULT_ATTRIBUTES: CubeAttributes = default_config_builder()
        .build()
        .and_then(|c| c.try_deserialize())
        .expect("error loading default attributes");
}

fn default_config_builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::from_str(
        DEFAULT_ATTRIBUTES_STR,
        ATTRIBUTES_FILE_FORMAT,
    ))
}

/// Display and animation attributes of a cube view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CubeAttributes {
    /// Seconds per quarter turn. Half turns take twice as long.
    pub twist_duration: f32,
    /// Whether to speed up twists while others are waiting to be animated.
    pub dynamic_twist_speed: bool,
    /// Easing curve for twists.
    pub twist_interpolation: InterpolateFn,
    /// Animation frames per second.
    pub frame_rate: u32,

    /// How far the corners are pushed apart, as a fraction of the corner
    /// size. 0 is a closed cube.
    pub explosion_factor: f32,
    /// Extra outward shift of each part, indexed by part.
    pub part_explosion: [f32; PART_COUNT],
    /// Scale of the whole cube, where 1 is the natural size.
    pub scale_factor: f32,

    /// Tilt of the view about the X axis, in radians.
    pub alpha: f32,
    /// Turn of the view about the Y axis, in radians.
    pub beta: f32,
}

impl Default for CubeAttributes {
    fn default() -> Self {
        Self {
            twist_duration: 0.4,
            dynamic_twist_speed: false,
            twist_interpolation: InterpolateFn::Spline,
            frame_rate: 60,

            explosion_factor: 0.0,
            part_explosion: [0.0; PART_COUNT],
            scale_factor: 1.0,

            alpha: (-25.0_f32).to_radians(),
            beta: 45.0_f32.to_radians(),
        }
    }
}

impl CubeAttributes {
    /// Loads attributes from the built-in defaults, then `user_file` (if
    /// any), then `CUBE_*` environment variables. If loading fails, logs a
    /// warning and returns the built-in defaults.
    pub fn load(user_file: Option<&Path>) -> Self {
        Self::try_load(user_file).unwrap_or_else(|e| {
            log::warn!("Error loading cube attributes: {e}");
            DEFAULT_ATTRIBUTES.clone()
        })
    }

    /// Loads attributes the same way as [`Self::load()`], but returns an
    /// error instead of falling back to defaults.
    pub fn try_load(user_file: Option<&Path>) -> Result<Self, PrefsError> {
        let env = config::Environment::with_prefix(ENV_PREFIX).try_parsing(true);
        Self::try_load_with_env(user_file, env)
    }

    fn try_load_with_env(
        user_file: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, PrefsError> {
        let mut config = default_config_builder();
        if let Some(path) = user_file {
            log::debug!("Loading cube attributes from {}", path.display());
            config = config.add_source(config::File::from(path).format(ATTRIBUTES_FILE_FORMAT));
        }
        let ret: Self = config.add_source(env).build()?.try_deserialize()?;
        ret.validate()?;
        Ok(ret)
    }

    /// Parses attributes from a YAML string. Missing attributes take their
    /// built-in default values.
    pub fn from_yaml_str(s: &str) -> Result<Self, PrefsError> {
        let ret: Self = default_config_builder()
            .add_source(config::File::from_str(s, ATTRIBUTES_FILE_FORMAT))
            .build()?
            .try_deserialize()?;
        ret.validate()?;
        Ok(ret)
    }

    /// Serializes the attributes to YAML.
    pub fn to_yaml_string(&self) -> Result<String, PrefsError> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Saves the attributes to a YAML file, creating parent directories if
    /// needed.
    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(p) = path.parent() {
            std::fs::create_dir_all(p)?;
        }
        serde_norway::to_writer(std::fs::File::create(path)?, self)?;
        Ok(())
    }

    /// Returns an error if any attribute is out of range.
    pub fn validate(&self) -> Result<(), PrefsError> {
        fn check(field: &'static str, ok: bool, value: impl ToString) -> Result<(), PrefsError> {
            match ok {
                true => Ok(()),
                false => Err(PrefsError::Invalid {
                    field,
                    reason: format!("{} is out of range", value.to_string()),
                }),
            }
        }

        let d = self.twist_duration;
        check("twist_duration", d.is_finite() && d >= 0.0, d)?;
        let f = self.explosion_factor;
        check("explosion_factor", f.is_finite() && f >= 0.0, f)?;
        for &e in &self.part_explosion {
            check("part_explosion", e.is_finite(), e)?;
        }
        let s = self.scale_factor;
        check("scale_factor", s.is_finite() && s > 0.0, s)?;
        check("frame_rate", self.frame_rate > 0, self.frame_rate)?;
        check("alpha", self.alpha.is_finite(), self.alpha)?;
        check("beta", self.beta.is_finite(), self.beta)?;
        Ok(())
    }
}
