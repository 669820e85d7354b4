use crate::classify::ClassificationPolicy;
use crate::types::observation::{Observation, SkyLayer};
use crate::types::sky_cover::SkyCover;

/// Ceiling reported when no layer forms a ceiling ("unlimited").
///
/// Far above the highest threshold used by the classifier (2500 ft), so an
/// observation without a ceiling always passes the VFR ceiling test.
pub const NO_CEILING_FT: i64 = 99999;

/// Whether a cover code forms a ceiling under `policy`.
pub fn is_ceiling_forming(cover: SkyCover, policy: ClassificationPolicy) -> bool {
    match cover {
        SkyCover::Broken | SkyCover::Overcast => true,
        SkyCover::VerticalVisibility => policy == ClassificationPolicy::Refined,
        SkyCover::Clear | SkyCover::Few | SkyCover::Scattered => false,
    }
}

/// Resolves the ceiling in feet from up to three sky layers.
///
/// The first ceiling-forming layer (scanning lowest first) decides. Its height is
/// truncated to whole feet; if that height is missing or not a finite number the
/// result is [`NO_CEILING_FT`], and later layers are not consulted. With no
/// ceiling-forming layer the result is also [`NO_CEILING_FT`].
pub fn resolve_layers(layers: &[SkyLayer], policy: ClassificationPolicy) -> i64 {
    let Some(layer) = layers.iter().find(|layer| {
        layer
            .cover
            .is_some_and(|cover| is_ceiling_forming(cover, policy))
    }) else {
        return NO_CEILING_FT;
    };

    match layer.height_ft {
        Some(height) if height.is_finite() => height.trunc() as i64,
        _ => NO_CEILING_FT,
    }
}

/// Resolves the ceiling of a single observation. See [`resolve_layers`].
///
/// # Examples
///
/// ```rust
/// use station_climo::{resolve_ceiling, ClassificationPolicy, Observation, SkyCover, SkyLayer, NO_CEILING_FT};
/// use chrono::{TimeZone, Utc};
///
/// let mut obs = Observation {
///     station: "MLB".to_string(),
///     valid: Utc.with_ymd_and_hms(2020, 6, 1, 12, 53, 0).unwrap(),
///     visibility_mi: Some(10.0),
///     sky_layers: [
///         SkyLayer::new(Some(SkyCover::Scattered), Some(2500.0)),
///         SkyLayer::new(Some(SkyCover::Broken), Some(4200.0)),
///         SkyLayer::absent(),
///     ],
///     gust_kt: None,
///     wx_codes: None,
/// };
/// assert_eq!(resolve_ceiling(&obs, ClassificationPolicy::Baseline), 4200);
///
/// obs.sky_layers[1] = SkyLayer::absent();
/// assert_eq!(resolve_ceiling(&obs, ClassificationPolicy::Baseline), NO_CEILING_FT);
/// ```
pub fn resolve_ceiling(observation: &Observation, policy: ClassificationPolicy) -> i64 {
    resolve_layers(&observation.sky_layers, policy)
}
