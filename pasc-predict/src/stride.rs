use pasc_bits::{Mode, Select};
use pasc_core::{PascError, Predictor, Word};

/// Predicts the previous true value.
#[derive(Debug, Clone, Default)]
pub struct LastValue<W: Word> {
    prev: W,
}

impl<W: Word> LastValue<W> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Word> Predictor<W> for LastValue<W> {
    fn predict(&self) -> W {
        self.prev
    }

    fn update(&mut self, value: W) {
        self.prev = value;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn name(&self) -> String {
        "Last Value".to_string()
    }
}

/// Predicts `prev + stride`, where stride is the last observed step.
#[derive(Debug, Clone, Default)]
pub struct Stride<W: Word> {
    prev: W,
    stride: W,
}

impl<W: Word> Stride<W> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Word> Predictor<W> for Stride<W> {
    fn predict(&self) -> W {
        self.prev.wrapping_add(&self.stride)
    }

    fn update(&mut self, value: W) {
        self.stride = value.wrapping_sub(&self.prev);
        self.prev = value;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn name(&self) -> String {
        "Stride".to_string()
    }
}

/// Two-delta stride: a new stride is adopted only once it is closer to the
/// previous step than the currently adopted one.
#[derive(Debug, Clone, Default)]
pub struct TwoStride<W: Word> {
    prev: W,
    best_stride: W,
    last_stride: W,
}

impl<W: Word> TwoStride<W> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Word> Predictor<W> for TwoStride<W> {
    fn predict(&self) -> W {
        self.prev.wrapping_add(&self.best_stride)
    }

    fn update(&mut self, value: W) {
        let stride = value.wrapping_sub(&self.prev);
        if stride.abs_diff_bits(self.last_stride) < stride.abs_diff_bits(self.best_stride) {
            self.best_stride = stride;
        }
        self.last_stride = stride;
        self.prev = value;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn name(&self) -> String {
        "Stride (2)".to_string()
    }
}

/// Stride predictor gated by a confidence counter.
///
/// A step whose top 11 bits match the stored stride raises confidence by one,
/// anything else lowers it by two (floored at zero). The stored stride is only
/// replaced while confidence is below the threshold.
#[derive(Debug, Clone)]
pub struct StrideConfidence<W: Word> {
    prev: W,
    stride: W,
    confidence: u32,
    threshold: u32,
    select: Select,
}

/// Bits compared between consecutive strides.
const CONFIDENCE_BITS: u32 = 11;

impl<W: Word> StrideConfidence<W> {
    pub fn new(threshold: u32) -> Result<Self, PascError> {
        let select = Select::new(Mode::left(CONFIDENCE_BITS, W::BITS)?);
        Ok(Self {
            prev: W::default(),
            stride: W::default(),
            confidence: 0,
            threshold,
            select,
        })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn confidence(&self) -> u32 {
        self.confidence
    }

    pub fn stride(&self) -> W {
        self.stride
    }
}

impl<W: Word> Predictor<W> for StrideConfidence<W> {
    fn predict(&self) -> W {
        self.prev.wrapping_add(&self.stride)
    }

    fn update(&mut self, value: W) {
        let stride = value.wrapping_sub(&self.prev);
        if self.select.apply(stride.to_bits()) == self.select.apply(self.stride.to_bits()) {
            self.confidence += 1;
        } else {
            self.confidence = self.confidence.saturating_sub(2);
        }
        if self.confidence < self.threshold {
            self.stride = stride;
        }
        self.prev = value;
    }

    fn reset(&mut self) {
        self.prev = W::default();
        self.stride = W::default();
        self.confidence = 0;
    }

    fn name(&self) -> String {
        format!("Stride Conf. (threshold: {})", self.threshold)
    }
}
