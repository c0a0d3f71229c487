//! Rest-frame spectral line catalog
//!
//! A fixed table of well-known emission and absorption features, with
//! lookup by name, type, redshift and wavelength range.

use serde::Serialize;

/// Half-width (Angstrom) of the rest-frame window used by [`identify`]
pub const IDENTIFY_WINDOW: f64 = 5.0;

/// A catalog line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RestFrameLine {
    /// Wavelength in Angstrom (rest frame, or observed frame after [`lookup`] with z > 0)
    pub wavelength: f64,

    /// Conventional line name
    pub name: &'static str,

    /// Type code: any combination of A (absorption), E (emission),
    /// B (broad), or "Break" for continuum breaks
    pub kind: &'static str,
}

impl RestFrameLine {
    const fn new(wavelength: f64, name: &'static str, kind: &'static str) -> Self {
        Self {
            wavelength,
            name,
            kind,
        }
    }

    pub fn is_absorption(&self) -> bool {
        self.kind.contains('A')
    }

    pub fn is_emission(&self) -> bool {
        self.kind.contains('E')
    }

    pub fn is_broad(&self) -> bool {
        self.kind.contains('B') && !self.is_break()
    }

    pub fn is_break(&self) -> bool {
        self.kind == "Break"
    }

    /// Same line moved to redshift `z`
    pub fn redshifted(&self, z: f64) -> Self {
        Self {
            wavelength: self.wavelength * (1.0 + z),
            ..*self
        }
    }
}

/// Known lines, roughly from the longest to the shortest wavelength
pub const RESTFRAME_LINES: &[RestFrameLine] = &[
    RestFrameLine::new(10320.0, "[SII]", "E"),
    RestFrameLine::new(8863.0, "TiO", "A"),
    RestFrameLine::new(8430.0, "TiO", "A"),
    RestFrameLine::new(8195.0, "NaI", "A"),
    RestFrameLine::new(8183.0, "NaI", "A"),
    RestFrameLine::new(7590.0, "TiO", "A"),
    RestFrameLine::new(7065.2, "HeI", "AE"),
    RestFrameLine::new(6725.0, "[SII]", "E"),
    RestFrameLine::new(6562.8, "Halpha", "AEB"),
    RestFrameLine::new(6159.0, "TiO", "A"),
    RestFrameLine::new(5892.5, "NaD", "A"),
    RestFrameLine::new(5603.0, "TiO", "A"),
    RestFrameLine::new(5269.0, "Ca,Fe", "A"),
    RestFrameLine::new(5175.4, "MgI", "A"),
    RestFrameLine::new(5006.8, "[OIII]", "E"),
    RestFrameLine::new(4958.9, "[OIII]", "E"),
    RestFrameLine::new(4861.3, "Hbeta", "AEB"),
    RestFrameLine::new(4340.4, "Hgamma", "AE"),
    RestFrameLine::new(4304.4, "Gband", "A"),
    RestFrameLine::new(4216.0, "CN", "A"),
    RestFrameLine::new(4101.7, "Hdelta", "AE"),
    RestFrameLine::new(4000.0, "Balmer_Break", "Break"),
    RestFrameLine::new(4072.0, "[SII]", "E"),
    RestFrameLine::new(3968.5, "CaII_H", "A"),
    RestFrameLine::new(3933.7, "CaII_K", "A"),
    RestFrameLine::new(3889.1, "Hksi,CN(H8)", "AE"),
    RestFrameLine::new(3869.0, "[NeIII]", "E"),
    RestFrameLine::new(3797.9, "Hteta", "AE"),
    RestFrameLine::new(3770.6, "H11", "AE"),
    RestFrameLine::new(3727.5, "[OII]", "E"),
    RestFrameLine::new(3581.0, "FeI", "A"),
    RestFrameLine::new(3425.8, "[NeV]", "E"),
    RestFrameLine::new(3345.9, "[NeV]", "E"),
    RestFrameLine::new(2964.0, "FeII_bump", "E"),
    RestFrameLine::new(2799.0, "MgII", "AEB"),
    RestFrameLine::new(2626.0, "FeII", "E"),
    RestFrameLine::new(2600.0, "FeII", "A"),
    RestFrameLine::new(2586.7, "FeII", "A"),
    RestFrameLine::new(2382.0, "FeII", "A"),
    RestFrameLine::new(2374.0, "FeII", "A"),
    RestFrameLine::new(2344.2, "FeII", "A"),
    RestFrameLine::new(2260.0, "FeII", "A"),
    RestFrameLine::new(2142.0, "[NII]", "E"),
    RestFrameLine::new(1909.0, "[CIII]", "EB"),
    RestFrameLine::new(1856.0, "AlIII", "A"),
    RestFrameLine::new(1670.8, "AlII", "A"),
    RestFrameLine::new(1666.1497, "OIII]", "E"),
    RestFrameLine::new(1640.0, "HeII", "AE"),
    RestFrameLine::new(1608.5, "FeII", "A"),
    RestFrameLine::new(1660.8092, "OIII]", "E"),
    RestFrameLine::new(1549.0, "CIV", "AEB"),
    RestFrameLine::new(1526.7, "SiII", "A"),
    RestFrameLine::new(1397.0, "SiIV+OIV", "AEB"),
    RestFrameLine::new(1334.5, "CII", "AE"),
    RestFrameLine::new(1303.0, "OI", "AE"),
    RestFrameLine::new(1260.4, "SiII", "A"),
    RestFrameLine::new(1240.0, "NV", "AE"),
    RestFrameLine::new(1215.7, "LyA", "AEB"),
    RestFrameLine::new(1033.0, "OVI", "AE"),
    RestFrameLine::new(1025.6, "LyB", "AE"),
    RestFrameLine::new(972.5, "LyG", "AE"),
];

/// Select catalog lines
///
/// # Arguments
/// * `name` - Case-insensitive exact name (all names when `None`)
/// * `line_type` - Case-insensitive substring of the type code, so `"A"` matches `"AEB"`
/// * `wavelength_range` - Inclusive bounds applied after redshifting; order does not matter
/// * `z` - Redshift applied to every selected wavelength
///
/// # Returns
/// Matching lines in catalog order, with wavelengths multiplied by (1 + z)
pub fn lookup(
    name: Option<&str>,
    line_type: Option<&str>,
    wavelength_range: Option<(f64, f64)>,
    z: f64,
) -> Vec<RestFrameLine> {
    let line_type = line_type.map(str::to_lowercase);
    let bounds = wavelength_range.map(|(a, b)| (a.min(b), a.max(b)));

    RESTFRAME_LINES
        .iter()
        .filter(|line| name.map_or(true, |n| n.eq_ignore_ascii_case(line.name)))
        .filter(|line| {
            line_type
                .as_deref()
                .map_or(true, |t| line.kind.to_lowercase().contains(t))
        })
        .map(|line| line.redshifted(z))
        .filter(|line| bounds.map_or(true, |(lo, hi)| lo <= line.wavelength && line.wavelength <= hi))
        .collect()
}

/// Rest-frame wavelengths of every catalog line
pub fn rest_wavelengths() -> Vec<f64> {
    RESTFRAME_LINES.iter().map(|line| line.wavelength).collect()
}

/// Catalog lines that could explain an observed feature at redshift `z`
///
/// # Arguments
/// * `observed` - Observed wavelength of the feature
/// * `z` - Assumed redshift
/// * `half_window` - Rest-frame half-width of the search window (see [`IDENTIFY_WINDOW`])
pub fn identify(observed: f64, z: f64, half_window: f64) -> Vec<RestFrameLine> {
    let rest = observed / (1.0 + z);
    lookup(None, None, Some((rest - half_window, rest + half_window)), 0.0)
}
