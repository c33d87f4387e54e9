//! The fixed analysis prompt sent with every image.
//!
//! The capacity guidance assumes zoom 18 at 600×600 px (≈0.6 m/pixel,
//! ≈360 m × 360 m frame). Bump [`PROMPT_VERSION`] whenever the text or the
//! calibrated view changes.

use wwtp_core::ImageSize;

pub const PROMPT_VERSION: &str = "wwtp-analysis/1";

pub const CALIBRATED_ZOOM: u8 = 18;
pub const CALIBRATED_SIZE: ImageSize = ImageSize::DEFAULT;

pub const ANALYSIS_PROMPT: &str = "\
Analyze this high-resolution satellite image (zoom level 18, 600x600 pixels) for wastewater treatment plant (WWTP) features:
1. Circular/oval structures (clarifiers, digesters, 20-50m diameter)
2. Rectangular basins (aeration tanks, settling ponds)
3. Water presence in structures (darker blue/gray)
4. Pipeline networks
5. Sludge processing areas
6. Industrial water treatment layout

Requirements:
- MUST have visible water in structures
- Multiple water-containing structures increase confidence

Additional Task:
- Estimate the WWTP capacity in Million Liters per Day (MLD) based on the visible water area
- At zoom 18, 1 pixel ≈ 0.6 meters; image covers ~360m x 360m
- Rough guideline: Small (<10 MLD), Medium (10-50 MLD), Large (>50 MLD) based on water surface area

Respond with:
[VERDICT] YES/NO/MAYBE
[WATER_PRESENT] YES/NO
[REASONING] Detailed analysis
[CONFIDENCE] Low/Medium/High
[CAPACITY_ESTIMATE] Estimated capacity in MLD (e.g., '5 MLD', '25 MLD', '60 MLD')";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::TAGS;

    #[test]
    fn prompt_names_every_parsed_tag() {
        for tag in TAGS {
            assert!(ANALYSIS_PROMPT.contains(tag), "prompt is missing {tag}");
        }
    }

    #[test]
    fn prompt_states_calibrated_view() {
        assert!(ANALYSIS_PROMPT.contains(&format!("zoom level {CALIBRATED_ZOOM}")));
        assert!(ANALYSIS_PROMPT.contains(&format!("{CALIBRATED_SIZE} pixels")));
    }
}
