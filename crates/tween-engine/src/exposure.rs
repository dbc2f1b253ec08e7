//! Exposure compensation for automatic shutter and aperture changes
//!
//! In aperture- or shutter-priority timelapses the camera changes its settings
//! between frames, which reads as flicker once the frames are rendered. Each
//! frame is compared against the average settings of its neighbours inside a
//! symmetric time window, and the difference is expressed in stops.

use std::ops::Range;

use tracing::{debug, info};

use crate::error::{Result, TweenError};
use crate::keyframes::Tweenpoints;
use crate::keys::Parameter;
use crate::record::PhotoRecord;

/// Exposure difference in stops between a base and a new shutter/aperture.
///
/// Positive when the new settings let in less light than the base, i.e. the
/// frame needs brightening. Doubling the shutter time is one stop; an f-number
/// change of one stop is a factor of sqrt(2), hence the 2 on the aperture term.
pub fn correction(base_shutter: f64, new_shutter: f64, base_aperture: f64, new_aperture: f64) -> f64 {
    base_shutter.log2() - new_shutter.log2() + 2.0 * (new_aperture.log2() - base_aperture.log2())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureCompensator {
    window_seconds: f64,
}

impl ExposureCompensator {
    pub fn new(window_seconds: f64) -> Result<Self> {
        if !window_seconds.is_finite() || window_seconds < 0.0 {
            return Err(TweenError::InvalidWindow(window_seconds));
        }
        Ok(Self { window_seconds })
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    /// Indices of the records within the window around `index`.
    ///
    /// Relies on `records` being sorted by capture time.
    pub fn window(&self, index: usize, records: &[PhotoRecord]) -> Range<usize> {
        let Some(current) = records.get(index) else {
            return index..index;
        };
        let in_window = |seconds: i64| seconds as f64 <= self.window_seconds;

        let mut start = index;
        while start > 0 && in_window(current.seconds_since(&records[start - 1])) {
            start -= 1;
        }

        let mut end = index + 1;
        while end < records.len() && in_window(records[end].seconds_since(current)) {
            end += 1;
        }

        start..end
    }

    /// Mean shutter speed and aperture over the window around `index`.
    pub fn local_average(&self, index: usize, records: &[PhotoRecord]) -> Result<(f64, f64)> {
        let window = self.window(index, records);
        if window.is_empty() {
            return Err(TweenError::EmptyWindow(index));
        }

        // Averaged as offsets from the first frame so a window of identical
        // settings returns those settings exactly
        let first = &records[window.start];
        let (base_shutter, base_aperture) = (first.shutter_speed()?, first.aperture()?);
        let count = window.len() as f64;

        let mut shutter_offset = 0.0;
        let mut aperture_offset = 0.0;
        for record in &records[window] {
            shutter_offset += record.shutter_speed()? - base_shutter;
            aperture_offset += record.aperture()? - base_aperture;
        }

        Ok((
            base_shutter + shutter_offset / count,
            base_aperture + aperture_offset / count,
        ))
    }

    /// Stops needed to bring record `index` in line with its neighbours.
    pub fn correction_for(&self, index: usize, records: &[PhotoRecord]) -> Result<f64> {
        let (avg_shutter, avg_aperture) = self.local_average(index, records)?;
        let record = &records[index];

        Ok(correction(
            avg_shutter,
            record.shutter_speed()?,
            avg_aperture,
            record.aperture()?,
        ))
    }

    /// Remove the automatic correction from every tweenpoint's exposure, so
    /// interpolation blends only what the photographer intended.
    pub fn compensate_tweenpoints(&self, tweenpoints: &Tweenpoints, records: &mut [PhotoRecord]) -> Result<()> {
        let corrections = tweenpoints
            .iter()
            .map(|i| self.correction_for(i, records).map(|c| (i, c)))
            .collect::<Result<Vec<_>>>()?;

        for (i, stops) in corrections {
            let record = &mut records[i];
            let exposure = record.get(Parameter::Exposure).unwrap_or(0.0);
            debug!(record = %record.label(), stops, "factoring out exposure correction");
            record.set(Parameter::Exposure, exposure - stops);
        }

        info!(tweenpoints = tweenpoints.len(), window = self.window_seconds, "compensated tweenpoints");
        Ok(())
    }

    /// Add the locally smoothed correction back onto every record.
    pub fn smooth_exposures(&self, records: &mut [PhotoRecord]) -> Result<()> {
        let corrections = (0..records.len())
            .map(|i| self.correction_for(i, records))
            .collect::<Result<Vec<_>>>()?;

        for (record, stops) in records.iter_mut().zip(corrections) {
            let exposure = record.get(Parameter::Exposure).unwrap_or(0.0);
            record.set(Parameter::Exposure, exposure + stops);
        }

        info!(records = records.len(), window = self.window_seconds, "smoothed exposures");
        Ok(())
    }
}
