//! Static encoding tables
//!
//! The classifier was trained on a vector built by concatenating these fields
//! in exactly this order. Reordering a row or a category silently corrupts
//! every prediction.

/// Width of the encoded feature vector
pub const FEATURE_DIM: usize = 38;

/// Form key of the numeric age field
pub const AGE: &str = "age";
/// Age used when the form omits it
pub const DEFAULT_AGE: i64 = 34;

/// Misspelled form key posted by older form templates for `hx_radiotherapy`
pub const LEGACY_HX_RADIOTHERAPY: &str = "hx_radiothreapy";

/// One-hot table. Enumerated categories take the leading slots; every other
/// value lands in the final catch-all slot.
#[derive(Debug)]
pub struct OneHot {
    pub categories: &'static [&'static str],
}

impl OneHot {
    pub const fn width(&self) -> usize {
        self.categories.len() + 1
    }

    /// Slot index for a raw value
    pub fn slot(&self, value: &str) -> usize {
        self.categories
            .iter()
            .position(|c| *c == value)
            .unwrap_or(self.categories.len())
    }
}

/// Ordinal lookup with a default code for unmapped values
#[derive(Debug)]
pub struct Ordinal {
    pub table: &'static [(&'static str, i64)],
    pub default: i64,
}

impl Ordinal {
    pub fn code(&self, value: &str) -> i64 {
        self.table
            .iter()
            .find(|(category, _)| *category == value)
            .map(|(_, code)| *code)
            .unwrap_or(self.default)
    }
}

#[derive(Debug)]
pub enum Encoding {
    OneHot(OneHot),
    Ordinal(Ordinal),
}

impl Encoding {
    pub const fn width(&self) -> usize {
        match self {
            Encoding::OneHot(table) => table.width(),
            Encoding::Ordinal(_) => 1,
        }
    }
}

/// Categorical input fields, in encoding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Gender,
    Smoking,
    HxSmoking,
    HxRadiotherapy,
    ThyroidFunction,
    PhysicalExamination,
    Pathology,
    Risk,
    Stage,
    Response,
    Adenopathy,
    Focality,
    T,
    N,
    M,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Gender,
        Field::Smoking,
        Field::HxSmoking,
        Field::HxRadiotherapy,
        Field::ThyroidFunction,
        Field::PhysicalExamination,
        Field::Pathology,
        Field::Risk,
        Field::Stage,
        Field::Response,
        Field::Adenopathy,
        Field::Focality,
        Field::T,
        Field::N,
        Field::M,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self as usize]
    }

    /// Form key (case-sensitive)
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn default_value(self) -> &'static str {
        self.spec().default
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Everything known about one categorical field
#[derive(Debug)]
pub struct FieldSpec {
    pub field: Field,
    pub name: &'static str,
    pub default: &'static str,
    pub encoding: Encoding,
    /// Values offered by the input form
    pub options: &'static [&'static str],
}

const YES_NO: &[&str] = &["No", "Yes"];

const TABLE: [FieldSpec; 15] = [
    FieldSpec {
        field: Field::Gender,
        name: "gender",
        default: "F",
        encoding: Encoding::OneHot(OneHot { categories: &["F"] }),
        options: &["F", "M"],
    },
    FieldSpec {
        field: Field::Smoking,
        name: "smoking",
        default: "No",
        encoding: Encoding::OneHot(OneHot { categories: &["No"] }),
        options: YES_NO,
    },
    FieldSpec {
        field: Field::HxSmoking,
        name: "hx_smoking",
        default: "No",
        encoding: Encoding::OneHot(OneHot { categories: &["No"] }),
        options: YES_NO,
    },
    FieldSpec {
        field: Field::HxRadiotherapy,
        name: "hx_radiotherapy",
        default: "No",
        encoding: Encoding::OneHot(OneHot { categories: &["No"] }),
        options: YES_NO,
    },
    FieldSpec {
        field: Field::ThyroidFunction,
        name: "thyroid_function",
        default: "Euthyroid",
        encoding: Encoding::OneHot(OneHot {
            categories: &[
                "Clinical Hypothyroidism",
                "Euthyroid",
                "Subclinical Hyperthyroidism",
            ],
        }),
        options: &[
            "Euthyroid",
            "Clinical Hyperthyroidism",
            "Clinical Hypothyroidism",
            "Subclinical Hyperthyroidism",
            "Subclinical Hypothyroidism",
        ],
    },
    FieldSpec {
        field: Field::PhysicalExamination,
        name: "physical_examination",
        // Truncated on purpose: this is the value the form has always posted
        default: "Single nodular goiter-righ",
        encoding: Encoding::OneHot(OneHot {
            categories: &[
                "Diffuse goiter",
                "Multinodular goiter",
                "Normal",
                "Single nodular goiter-left",
            ],
        }),
        options: &[
            "Single nodular goiter-left",
            "Single nodular goiter-right",
            "Multinodular goiter",
            "Diffuse goiter",
            "Normal",
        ],
    },
    FieldSpec {
        field: Field::Pathology,
        name: "Pathology",
        default: "Micropapillary",
        encoding: Encoding::OneHot(OneHot {
            categories: &["Follicular", "Hurthel cell", "Micropapillary"],
        }),
        options: &["Micropapillary", "Papillary", "Follicular", "Hurthel cell"],
    },
    FieldSpec {
        field: Field::Risk,
        name: "risk",
        default: "Low",
        encoding: Encoding::OneHot(OneHot {
            categories: &["High", "Intermediate"],
        }),
        options: &["Low", "Intermediate", "High"],
    },
    FieldSpec {
        field: Field::Stage,
        name: "Stage",
        default: "1",
        // "4a" deliberately shares the catch-all slot with unknown stages
        encoding: Encoding::OneHot(OneHot {
            categories: &["1", "2", "3"],
        }),
        options: &["1", "2", "3", "4a", "4b"],
    },
    FieldSpec {
        field: Field::Response,
        name: "Response",
        default: "Indeterminate",
        encoding: Encoding::OneHot(OneHot {
            categories: &[
                "Biochemical Incomplete",
                "Excellent",
                "Subclinical Indeterminate",
            ],
        }),
        options: &[
            "Indeterminate",
            "Excellent",
            "Structural Incomplete",
            "Biochemical Incomplete",
            "Subclinical Indeterminate",
        ],
    },
    FieldSpec {
        field: Field::Adenopathy,
        name: "Adenopathy",
        default: "No",
        encoding: Encoding::Ordinal(Ordinal {
            table: &[
                ("No", 3),
                ("Right", 5),
                ("Extensive", 1),
                ("Left", 2),
                ("Bilateral", 0),
            ],
            default: 4,
        }),
        options: &["No", "Right", "Left", "Bilateral", "Extensive", "Posterior"],
    },
    FieldSpec {
        field: Field::Focality,
        name: "Focality",
        default: "Uni-Focal",
        encoding: Encoding::Ordinal(Ordinal {
            table: &[("Uni-Focal", 1)],
            default: 0,
        }),
        options: &["Uni-Focal", "Multi-Focal"],
    },
    FieldSpec {
        field: Field::T,
        name: "T",
        default: "T1a",
        encoding: Encoding::Ordinal(Ordinal {
            table: &[
                ("T1a", 0),
                ("T1b", 1),
                ("T2", 2),
                ("T3a", 3),
                ("T3b", 4),
                ("T4a", 5),
            ],
            default: 6,
        }),
        options: &["T1a", "T1b", "T2", "T3a", "T3b", "T4a", "T4b"],
    },
    FieldSpec {
        field: Field::N,
        name: "N",
        default: "N0",
        // N1a and unknown values both map to 1
        encoding: Encoding::Ordinal(Ordinal {
            table: &[("N0", 0), ("N1a", 1), ("N1b", 2)],
            default: 1,
        }),
        options: &["N0", "N1a", "N1b"],
    },
    FieldSpec {
        field: Field::M,
        name: "M",
        default: "M0",
        encoding: Encoding::Ordinal(Ordinal {
            table: &[("M0", 0)],
            default: 1,
        }),
        options: &["M0", "M1"],
    },
];

/// Categorical fields in encoding order; age is appended last
pub static FIELDS: [FieldSpec; 15] = TABLE;

const fn encoded_width() -> usize {
    let mut width = 1; // age
    let mut i = 0;
    while i < TABLE.len() {
        width += TABLE[i].encoding.width();
        i += 1;
    }
    width
}

const _: () = assert!(encoded_width() == FEATURE_DIM);
