//! Sticker-sheet arithmetic.
//!
//! Stickers come in single- and double-label variants; a print request is
//! rounded up to whole stickers before anything is rendered.

use serde::{Deserialize, Serialize};

/// Physical sticker stock loaded in the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerKind {
    NormalSingle,
    NormalDouble,
    HighDurabilitySingle,
    HighDurabilityDouble,
}

impl StickerKind {
    /// How many labels one sticker of this kind carries.
    pub fn labels_per_sticker(self) -> u32 {
        match self {
            StickerKind::NormalSingle | StickerKind::HighDurabilitySingle => 1,
            StickerKind::NormalDouble | StickerKind::HighDurabilityDouble => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StickerKind::NormalSingle => "normal-single",
            StickerKind::NormalDouble => "normal-double",
            StickerKind::HighDurabilitySingle => "high-durability-single",
            StickerKind::HighDurabilityDouble => "high-durability-double",
        }
    }
}

/// A print request resolved to whole stickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPlan {
    /// Labels that will actually be produced (multiple of labels-per-sticker).
    pub labels: u32,
    /// Stickers consumed.
    pub stickers: u32,
}

impl SheetPlan {
    /// Most stickers a single request may consume.
    pub const MAX_STICKERS: u32 = 20;

    /// Resolve a requested label count against the sticker stock.
    ///
    /// The request is rounded up to the next multiple of labels-per-sticker
    /// and clamped to [1, `MAX_STICKERS`] stickers.
    pub fn plan(kind: StickerKind, requested_labels: u32) -> Self {
        let per = kind.labels_per_sticker();

        let mut labels = requested_labels;
        if labels % per != 0 {
            labels += per - labels % per;
        }
        labels = labels.clamp(per, per * Self::MAX_STICKERS);

        Self {
            labels,
            stickers: labels / per,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KINDS: [StickerKind; 4] = [
        StickerKind::NormalSingle,
        StickerKind::NormalDouble,
        StickerKind::HighDurabilitySingle,
        StickerKind::HighDurabilityDouble,
    ];

    #[test]
    fn odd_request_on_double_stock_rounds_up() {
        let plan = SheetPlan::plan(StickerKind::NormalDouble, 3);
        assert_eq!(plan.labels, 4);
        assert_eq!(plan.stickers, 2);
    }

    #[test]
    fn exact_request_is_kept() {
        let plan = SheetPlan::plan(StickerKind::HighDurabilitySingle, 5);
        assert_eq!(plan.labels, 5);
        assert_eq!(plan.stickers, 5);
    }

    #[test]
    fn zero_request_becomes_one_sticker() {
        let plan = SheetPlan::plan(StickerKind::NormalDouble, 0);
        assert_eq!(plan.labels, 2);
        assert_eq!(plan.stickers, 1);
    }

    #[test]
    fn oversized_request_is_clamped() {
        let plan = SheetPlan::plan(StickerKind::NormalSingle, 500);
        assert_eq!(plan.labels, SheetPlan::MAX_STICKERS);
        assert_eq!(plan.stickers, SheetPlan::MAX_STICKERS);
    }

    proptest! {
        /// Property: every plan is whole stickers, within bounds, and never
        /// short of an in-range request.
        #[test]
        fn plans_are_whole_stickers(kind_idx in 0usize..4, requested in 0u32..200) {
            let kind = KINDS[kind_idx];
            let per = kind.labels_per_sticker();
            let plan = SheetPlan::plan(kind, requested);

            prop_assert_eq!(plan.labels % per, 0);
            prop_assert!(plan.labels >= per);
            prop_assert!(plan.labels <= per * SheetPlan::MAX_STICKERS);
            prop_assert_eq!(plan.stickers, plan.labels / per);

            if requested >= 1 && requested <= per * SheetPlan::MAX_STICKERS {
                prop_assert!(plan.labels >= requested);
                // Rounding never wastes a whole sticker.
                prop_assert!(plan.labels - requested < per);
            }
        }
    }
}
