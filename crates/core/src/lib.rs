//! Core types shared by the mtex crates.
//!
//! Dimensions in mtex are real numbers measured in pixels at the
//! resolution of the current layout.
//! The only structured type here is [Glue], along with the bookkeeping
//! needed to decide which glue stretches or shrinks when a list is set
//! to a size other than its natural size.

/// Glue.
///
/// A piece of glue has a natural width plus a stretch and a shrink
/// component, each with an order of infinity.
///
/// Described in TeX.2021.150.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glue {
    pub width: f64,
    pub stretch: f64,
    pub stretch_order: GlueOrder,
    pub shrink: f64,
    pub shrink_order: GlueOrder,
}

impl Glue {
    /// Glue with no width that stretches by one unit of order fil.
    pub const FIL: Glue = Glue::infinite_stretch(GlueOrder::Fil);
    /// Glue with no width that stretches by one unit of order fill.
    pub const FILL: Glue = Glue::infinite_stretch(GlueOrder::Fill);
    /// Glue with no width that stretches by one unit of order filll.
    pub const FILLL: Glue = Glue::infinite_stretch(GlueOrder::Filll);
    /// Glue with no width that shrinks by one unit of order fil.
    pub const NEG_FIL: Glue = Glue::infinite_shrink(GlueOrder::Fil);
    /// Glue with no width that shrinks by one unit of order fill.
    pub const NEG_FILL: Glue = Glue::infinite_shrink(GlueOrder::Fill);
    /// Glue with no width that shrinks by one unit of order filll.
    pub const NEG_FILLL: Glue = Glue::infinite_shrink(GlueOrder::Filll);
    /// Glue that does nothing.
    pub const EMPTY: Glue = Glue {
        width: 0.0,
        stretch: 0.0,
        stretch_order: GlueOrder::Normal,
        shrink: 0.0,
        shrink_order: GlueOrder::Normal,
    };
    /// The glue `0pt plus 1fil minus -1fil`.
    ///
    /// A pair of these glues around some content centers the content
    /// both when the enclosing box is wider and when it is narrower
    /// than the content.
    /// This is TeX's `\hss`/`\vss` with the shrink sign inverted.
    pub const SS: Glue = Glue {
        width: 0.0,
        stretch: 1.0,
        stretch_order: GlueOrder::Fil,
        shrink: -1.0,
        shrink_order: GlueOrder::Fil,
    };

    const fn infinite_stretch(order: GlueOrder) -> Glue {
        Glue {
            width: 0.0,
            stretch: 1.0,
            stretch_order: order,
            shrink: 0.0,
            shrink_order: GlueOrder::Normal,
        }
    }

    const fn infinite_shrink(order: GlueOrder) -> Glue {
        Glue {
            width: 0.0,
            stretch: 0.0,
            stretch_order: GlueOrder::Normal,
            shrink: 1.0,
            shrink_order: order,
        }
    }

    /// Rigid glue of the provided width.
    pub fn fixed(width: f64) -> Glue {
        Glue {
            width,
            ..Glue::EMPTY
        }
    }
}

/// Order of infinity of a glue stretch or shrink.
///
/// When setting a list of boxes, TeX stretches or shrinks glue boxes.
/// In some cases it is desirable that TeX only stretches some subset of the
/// glue boxes.
/// For example, when setting centered text, TeX only stretches the two glue
/// boxes at each end of the list and leaves all other glue intact.
///
/// To achieve this, each glue stretch or shrink has an order of infinity.
/// If a list contains glue of some order (e.g. [GlueOrder::Fil]),
/// then glues of a lower order (e.g. [GlueOrder::Normal]) are not stretched
/// or shrunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueOrder {
    #[default]
    Normal,
    Fil,
    Fill,
    Filll,
}

impl GlueOrder {
    /// All orders, from least to most flexible.
    pub const ALL: [GlueOrder; 4] = [
        GlueOrder::Normal,
        GlueOrder::Fil,
        GlueOrder::Fill,
        GlueOrder::Filll,
    ];

    /// Index of this order in [GlueOrder::ALL].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [GlueOrder::index].
    pub fn from_index(i: usize) -> Option<Self> {
        GlueOrder::ALL.get(i).copied()
    }
}

impl std::fmt::Display for GlueOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use GlueOrder::*;
        match self {
            Normal => Ok(()),
            Fil => write!(f, "fil"),
            Fill => write!(f, "fill"),
            Filll => write!(f, "filll"),
        }
    }
}

/// Stretch and shrink accumulated over a list, one total per order.
///
/// TeX keeps these in the `total_stretch` and `total_shrink` arrays
/// (TeX.2021.646).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlueTotals {
    pub stretch: [f64; 4],
    pub shrink: [f64; 4],
}

impl GlueTotals {
    /// Adds the stretch and shrink of a glue to the totals.
    pub fn add(&mut self, glue: &Glue) {
        self.stretch[glue.stretch_order.index()] += glue.stretch;
        self.shrink[glue.shrink_order.index()] += glue.shrink;
    }

    /// The order that stretches in a list with these totals.
    pub fn stretch_order(&self) -> GlueOrder {
        order_of(&self.stretch)
    }

    /// The order that shrinks in a list with these totals.
    pub fn shrink_order(&self) -> GlueOrder {
        order_of(&self.shrink)
    }
}

fn order_of(totals: &[f64; 4]) -> GlueOrder {
    GlueOrder::from_index(determine_order(totals)).unwrap_or_default()
}

/// Returns the index of the most flexible order with a nonzero total.
///
/// The scan goes from the most flexible order to the least flexible one.
/// If every total is zero the result is 0, the finite order.
///
/// Described in TeX.2021.659.
pub fn determine_order(totals: &[f64]) -> usize {
    totals
        .iter()
        .rposition(|total| *total != 0.0)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! determine_order_tests {
        ( $( ($name: ident, $totals: expr, $want: expr,), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(determine_order(&$totals), $want);
                }
            )+
        };
    }

    determine_order_tests!(
        (determine_order_1, [1.0, 2.0, 3.0, 0.0], 2,),
        (determine_order_2, [1.0, 2.0, 3.0, 4.0], 3,),
        (determine_order_3, [0.0, 2.0, 3.0, 0.0], 2,),
        (determine_order_4, [0.0, 1.0, 0.0, 0.0], 1,),
        (determine_order_all_zero, [0.0, 0.0, 0.0, 0.0], 0,),
        (determine_order_negative, [0.0, -2.0, 0.0, 0.0], 1,),
    );

    #[test]
    fn named_glue() {
        for (glue, stretch, stretch_order, shrink, shrink_order) in [
            (Glue::FIL, 1.0, GlueOrder::Fil, 0.0, GlueOrder::Normal),
            (Glue::FILL, 1.0, GlueOrder::Fill, 0.0, GlueOrder::Normal),
            (Glue::FILLL, 1.0, GlueOrder::Filll, 0.0, GlueOrder::Normal),
            (Glue::NEG_FIL, 0.0, GlueOrder::Normal, 1.0, GlueOrder::Fil),
            (Glue::NEG_FILL, 0.0, GlueOrder::Normal, 1.0, GlueOrder::Fill),
            (Glue::NEG_FILLL, 0.0, GlueOrder::Normal, 1.0, GlueOrder::Filll),
            (Glue::EMPTY, 0.0, GlueOrder::Normal, 0.0, GlueOrder::Normal),
            (Glue::SS, 1.0, GlueOrder::Fil, -1.0, GlueOrder::Fil),
            (Glue::fixed(0.0), 0.0, GlueOrder::Normal, 0.0, GlueOrder::Normal),
        ] {
            let want = Glue {
                width: 0.0,
                stretch,
                stretch_order,
                shrink,
                shrink_order,
            };
            assert_eq!(glue, want);
        }
    }

    #[test]
    fn totals() {
        let mut totals: GlueTotals = Default::default();
        totals.add(&Glue::FIL);
        totals.add(&Glue::fixed(3.0));
        totals.add(&Glue::NEG_FILLL);
        totals.add(&Glue::SS);
        assert_eq!(totals.stretch, [0.0, 2.0, 0.0, 0.0]);
        assert_eq!(totals.shrink, [0.0, -1.0, 0.0, 1.0]);
        assert_eq!(totals.stretch_order(), GlueOrder::Fil);
        assert_eq!(totals.shrink_order(), GlueOrder::Filll);
    }

    #[test]
    fn glue_order_round_trip() {
        for order in GlueOrder::ALL {
            assert_eq!(GlueOrder::from_index(order.index()), Some(order));
            let name = order.to_string();
            assert_eq!(name.is_empty(), order == GlueOrder::Normal);
        }
    }
}
