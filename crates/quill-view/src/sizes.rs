//! Size requirements and the allocation-spreading algorithm.
//!
//! A container gathers one [`SizeRequirements`] per child and then either
//! tiles them end to end along its major axis, or aligns them on a shared
//! alignment point along its minor axis.

/// Stand-in for an unbounded span.
pub const MAX_SPAN: f32 = 1.0e9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRequirements {
    pub minimum: f32,
    pub preferred: f32,
    pub maximum: f32,
    /// Fraction of the span that lies before the alignment point.
    pub alignment: f32,
}

impl Default for SizeRequirements {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.5)
    }
}

impl SizeRequirements {
    pub fn new(minimum: f32, preferred: f32, maximum: f32, alignment: f32) -> Self {
        Self {
            minimum,
            preferred,
            maximum,
            alignment: alignment.clamp(0.0, 1.0),
        }
    }

    pub fn fixed(span: f32) -> Self {
        Self::new(span, span, span, 0.5)
    }
}

/// Requirements of children laid end to end.
pub fn tiled_requirements(children: &[SizeRequirements]) -> SizeRequirements {
    let mut total = SizeRequirements::default();
    for req in children {
        total.minimum = (total.minimum + req.minimum).min(MAX_SPAN);
        total.preferred = (total.preferred + req.preferred).min(MAX_SPAN);
        total.maximum = (total.maximum + req.maximum).min(MAX_SPAN);
    }
    total
}

/// Requirements of children sharing one alignment point.
pub fn aligned_requirements(children: &[SizeRequirements]) -> SizeRequirements {
    if children.is_empty() {
        return SizeRequirements::default();
    }
    let (mut min_a, mut min_d) = (0.0f32, 0.0f32);
    let (mut pref_a, mut pref_d) = (0.0f32, 0.0f32);
    let (mut max_a, mut max_d) = (0.0f32, 0.0f32);
    for req in children {
        let a = req.alignment;
        min_a = min_a.max(req.minimum * a);
        min_d = min_d.max(req.minimum - req.minimum * a);
        pref_a = pref_a.max(req.preferred * a);
        pref_d = pref_d.max(req.preferred - req.preferred * a);
        max_a = max_a.max(req.maximum * a);
        max_d = max_d.max(req.maximum - req.maximum * a);
    }
    let preferred = (pref_a + pref_d).min(MAX_SPAN);
    let alignment = if preferred > 0.0 { pref_a / preferred } else { 0.5 };
    SizeRequirements::new(
        (min_a + min_d).min(MAX_SPAN),
        preferred,
        (max_a + max_d).min(MAX_SPAN),
        alignment,
    )
}

/// Offsets and spans for children laid end to end in `allocated`.
///
/// When the allocation exceeds the preferred total every child grows toward
/// its maximum in proportion to its room to grow; otherwise every child
/// shrinks toward its minimum in proportion to its room to shrink.
pub fn calculate_tiled_positions(
    allocated: f32,
    total: Option<&SizeRequirements>,
    children: &[SizeRequirements],
) -> (Vec<f32>, Vec<f32>) {
    let total = total.copied().unwrap_or_else(|| tiled_requirements(children));
    let mut offsets = Vec::with_capacity(children.len());
    let mut spans = Vec::with_capacity(children.len());
    let mut offset = 0.0;

    if allocated >= total.preferred {
        let room = total.maximum - total.preferred;
        let play = (allocated - total.preferred).min(room);
        let factor = if room > 0.0 { play / room } else { 0.0 };
        for req in children {
            let span = req.preferred + factor * (req.maximum - req.preferred);
            offsets.push(offset);
            spans.push(span);
            offset += span;
        }
    } else {
        let room = total.preferred - total.minimum;
        let play = (total.preferred - allocated).min(room);
        let factor = if room > 0.0 { play / room } else { 0.0 };
        for req in children {
            let span = req.preferred - factor * (req.preferred - req.minimum);
            offsets.push(offset);
            spans.push(span);
            offset += span;
        }
    }
    (offsets, spans)
}

/// Offsets and spans for children sharing the alignment point of `total`
/// inside `allocated`.
pub fn calculate_aligned_positions(
    allocated: f32,
    total: Option<&SizeRequirements>,
    children: &[SizeRequirements],
) -> (Vec<f32>, Vec<f32>) {
    let alignment = total.map_or(0.5, |t| t.alignment);
    let total_ascent = allocated * alignment;
    let total_descent = allocated - total_ascent;
    children
        .iter()
        .map(|req| {
            let max_ascent = req.maximum * req.alignment;
            let max_descent = req.maximum - max_ascent;
            let ascent = total_ascent.min(max_ascent);
            let descent = total_descent.min(max_descent);
            (total_ascent - ascent, ascent + descent)
        })
        .unzip()
}
