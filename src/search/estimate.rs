//! Correlation-peak pipeline and its entry points.

use crate::candidate::{locate_peak, peak_neighborhood, Peak};
use crate::image::{Image, ImageView};
use crate::kernel::scalar::ZnccScalar;
use crate::kernel::Correlator;
use crate::preprocess::repair_nonfinite;
use crate::refine::correlation_shifts;
use crate::search::{EstimatorConfig, Shift};
use crate::trace::{trace_event, trace_span};
use crate::util::CoalignResult;

/// Estimates the sub-pixel location of the maximum of a correlation surface.
///
/// The integer peak is refined over its clamped neighborhood and the refined
/// neighborhood coordinates are added to the peak position.
pub fn find_best_match_location(surface: ImageView<'_, f64>) -> CoalignResult<Shift> {
    locate_and_refine(surface).map(|(shift, _)| shift)
}

fn locate_and_refine(surface: ImageView<'_, f64>) -> CoalignResult<(Shift, Peak)> {
    let peak = locate_peak(surface);
    let (neighborhood, _origin) = peak_neighborhood(surface, peak)?;
    let (dy, dx) = correlation_shifts(neighborhood)?;
    let shift = Shift {
        y: dy + peak.y as f64,
        x: dx + peak.x as f64,
    };
    trace_event!(
        "peak",
        x = peak.x,
        y = peak.y,
        score = peak.score,
        shift_x = shift.x,
        shift_y = shift.y
    );
    Ok((shift, peak))
}

/// Full outcome of one estimation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftReport {
    /// Refined shift of the template within the layer.
    pub shift: Shift,
    /// Integer correlation peak the shift was refined from.
    pub peak: Peak,
    /// Samples repaired in the layer.
    pub repaired_layer: usize,
    /// Samples repaired in the template.
    pub repaired_template: usize,
}

/// Locates a template inside a layer with sub-pixel precision.
#[derive(Clone, Debug, Default)]
pub struct ShiftEstimator {
    cfg: EstimatorConfig,
}

impl ShiftEstimator {
    /// Creates an estimator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: EstimatorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.cfg
    }

    /// Estimates the shift that puts `template` at its best position in `layer`.
    ///
    /// Both images are data-mapped and repaired in place, which is why they
    /// are borrowed mutably.
    pub fn estimate(&self, layer: &mut Image, template: &mut Image) -> CoalignResult<Shift> {
        self.estimate_report(layer, template)
            .map(|report| report.shift)
    }

    /// Like [`estimate`](Self::estimate), also returning the integer peak and
    /// repair counts.
    pub fn estimate_report(
        &self,
        layer: &mut Image,
        template: &mut Image,
    ) -> CoalignResult<ShiftReport> {
        self.cfg.validate()?;
        if self.cfg.parallel {
            #[cfg(feature = "rayon")]
            return self.estimate_with(&crate::kernel::rayon::ZnccParallel, layer, template);
        }
        self.estimate_with(&ZnccScalar, layer, template)
    }

    /// Runs the pipeline with a caller-supplied correlation primitive.
    pub fn estimate_with<C: Correlator + ?Sized>(
        &self,
        correlator: &C,
        layer: &mut Image,
        template: &mut Image,
    ) -> CoalignResult<ShiftReport> {
        let _span = trace_span!(
            "estimate_shift",
            layer_w = layer.width(),
            layer_h = layer.height(),
            tpl_w = template.width(),
            tpl_h = template.height()
        )
        .entered();

        layer.map_in_place(self.cfg.data_map);
        template.map_in_place(self.cfg.data_map);
        let repaired_layer = repair_nonfinite(layer)?;
        let repaired_template = repair_nonfinite(template)?;

        let surface = correlator.correlate(layer.view(), template.view())?;
        let (shift, peak) = locate_and_refine(surface.view())?;
        Ok(ShiftReport {
            shift,
            peak,
            repaired_layer,
            repaired_template,
        })
    }
}

/// Estimates the shift of `template` in `layer` with the default estimator.
pub fn calculate_shift(layer: &mut Image, template: &mut Image) -> CoalignResult<Shift> {
    ShiftEstimator::new().estimate(layer, template)
}
