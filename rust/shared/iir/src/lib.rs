//! Linear filtering building blocks: polyphase IIR resamplers for oversampling,
//! zero-delay-feedback one-pole filters and a pinking filter.

pub mod one_pole;
pub mod pinking;
pub mod resampler;
