//! Named value-format predicates used by the column rules.
//!
//! Each predicate is a regular expression (plus a small amount of code where
//! a plain regex cannot express the rule) wrapped with a name and an intent
//! string so it can be reported and tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named predicate over raw field values.
pub struct ValuePattern {
    /// Short identifier.
    pub name: &'static str,
    /// What a matching value looks like.
    pub intent: &'static str,
    matcher: fn(&str) -> bool,
}

impl ValuePattern {
    /// Whether `value` has the expected format.
    pub fn matches(&self, value: &str) -> bool {
        (self.matcher)(value)
    }
}

impl std::fmt::Debug for ValuePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuePattern").field("name", &self.name).finish()
    }
}

/// Unsigned decimal without a redundant leading zero.
const DECIMAL: &str = r"(?:0|[1-9][0-9]*)(?:\.[0-9]+)?";

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("^{}$", DECIMAL)).unwrap());

static PHENOTYPIC_SEROTYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:NT|[1-9][0-9]?[A-Z]?(?:[&/](?:[1-9][0-9]?[A-Z]?|[A-Z]|NT))*)$").unwrap()
});

static ANTIBIOTIC_AST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:[IRS]|NS|(?:[<>]=?)?{})$", DECIMAL)).unwrap()
});

static SANGER_LANE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{3,4}_[1-9]#[1-9][0-9]{0,2}$").unwrap());

static SANGER_SAMPLE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}STDY[0-9]{7,8}$").unwrap());

static RUN_ACCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:NOTFOUND|[ESD]RR[0-9]{6,8})$").unwrap());

static SAMPLE_ACCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ESD]RS[0-9]{6,8}$").unwrap());

static MLST_OUTPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:~?[0-9]+|[0-9]+\?)(?:,(?:~?[0-9]+|[0-9]+\?))*|-)$").unwrap()
});

static HEX_COLOUR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-F]{6}$").unwrap());

static SEROTYPE_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([1-9][0-9]?)[A-Z]?((?:/[0-9]{1,2}[A-Z])*)$").unwrap());

const SEROTYPE_SPECIAL_CALLS: &[&str] = &[
    "6E(6A)",
    "6E(6B)",
    "23B1",
    "SEROGROUP 24",
    "19AF",
    "SWISS_NT",
    "ALTERNATIVE_ALIB_NT",
    "UNTYPABLE",
    "COVERAGE TOO LOW",
    "SEROBA FAILURE",
];

static POSSIBLE_6_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^POSSIBLE 6[A-Z]$").unwrap());

static WGS_MIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:NA|FLAG|NF|(?:[<>]=?)?{d}|{d}-{d})$",
        d = DECIMAL
    ))
    .unwrap()
});

static PBP_TRIPLE_RE: Lazy<Regex> = Lazy::new(|| {
    let part = r"(?:NEW|NF|ERROR|0|[1-9][0-9]{0,2})";
    Regex::new(&format!(r"^{p}__{p}__{p}$", p = part)).unwrap()
});

fn is_decimal(v: &str) -> bool {
    DECIMAL_RE.is_match(v)
}

fn is_phenotypic_serotype(v: &str) -> bool {
    PHENOTYPIC_SEROTYPE_RE.is_match(v)
}

fn is_antibiotic_ast(v: &str) -> bool {
    ANTIBIOTIC_AST_RE.is_match(v)
}

fn is_sanger_lane_id(v: &str) -> bool {
    SANGER_LANE_ID_RE.is_match(v)
}

fn is_sanger_sample_id(v: &str) -> bool {
    SANGER_SAMPLE_ID_RE.is_match(v)
}

fn is_run_accession(v: &str) -> bool {
    RUN_ACCESSION_RE.is_match(v)
}

fn is_sample_accession(v: &str) -> bool {
    SAMPLE_ACCESSION_RE.is_match(v)
}

fn is_mlst_output(v: &str) -> bool {
    MLST_OUTPUT_RE.is_match(v)
}

fn is_hex_colour(v: &str) -> bool {
    HEX_COLOUR_RE.is_match(v)
}

fn is_hex_colour_or_transparent(v: &str) -> bool {
    v == "TRANSPARENT" || HEX_COLOUR_RE.is_match(v)
}

fn is_wgs_mic(v: &str) -> bool {
    WGS_MIC_RE.is_match(v)
}

fn is_pbp_type_triple(v: &str) -> bool {
    PBP_TRIPLE_RE.is_match(v)
}

/// Serotype calls: a serogroup number with optional letter, optionally
/// followed by `/`-joined alternatives of the same serogroup (`15B/15C`),
/// or one of the typing tool's special calls.
fn is_in_silico_serotype(v: &str) -> bool {
    if SEROTYPE_SPECIAL_CALLS.contains(&v) || POSSIBLE_6_RE.is_match(v) {
        return true;
    }
    let Some(caps) = SEROTYPE_GROUP_RE.captures(v) else {
        return false;
    };
    let group = &caps[1];
    caps[2]
        .split('/')
        .skip(1)
        .all(|alt| alt.len() == group.len() + 1 && alt.starts_with(group))
}

pub static PLAIN_DECIMAL: ValuePattern = ValuePattern {
    name: "plain_decimal",
    intent: "unsigned decimal number without leading zeros, e.g. 0, 4.5, 130",
    matcher: is_decimal,
};

pub static PHENOTYPIC_SEROTYPE: ValuePattern = ValuePattern {
    name: "phenotypic_serotype",
    intent: "NT, or serotypes joined by / or &, e.g. 6A/6B, 19F&NT",
    matcher: is_phenotypic_serotype,
};

pub static ANTIBIOTIC_AST: ValuePattern = ValuePattern {
    name: "antibiotic_ast",
    intent: "I, R, S, NS, or a MIC optionally prefixed by <, >, <=, >=",
    matcher: is_antibiotic_ast,
};

pub static SANGER_LANE_ID: ValuePattern = ValuePattern {
    name: "sanger_lane_id",
    intent: "Sanger lane id, e.g. 12345_6#78",
    matcher: is_sanger_lane_id,
};

pub static SANGER_SAMPLE_ID: ValuePattern = ValuePattern {
    name: "sanger_sample_id",
    intent: "Sanger sample id, e.g. 1234STDY1234567",
    matcher: is_sanger_sample_id,
};

pub static RUN_ACCESSION: ValuePattern = ValuePattern {
    name: "run_accession",
    intent: "ENA/SRA/DDBJ run accession or NOTFOUND",
    matcher: is_run_accession,
};

pub static SAMPLE_ACCESSION: ValuePattern = ValuePattern {
    name: "sample_accession",
    intent: "ENA/SRA/DDBJ sample accession",
    matcher: is_sample_accession,
};

pub static MLST_OUTPUT: ValuePattern = ValuePattern {
    name: "mlst_output",
    intent: "mlst allele call: N, ~N, N?, comma-separated calls, or -",
    matcher: is_mlst_output,
};

pub static HEX_COLOUR: ValuePattern = ValuePattern {
    name: "hex_colour",
    intent: "upper-case hex colour, e.g. #1A2B3C",
    matcher: is_hex_colour,
};

pub static HEX_COLOUR_OR_TRANSPARENT: ValuePattern = ValuePattern {
    name: "hex_colour_or_transparent",
    intent: "upper-case hex colour or TRANSPARENT",
    matcher: is_hex_colour_or_transparent,
};

pub static IN_SILICO_SEROTYPE: ValuePattern = ValuePattern {
    name: "in_silico_serotype",
    intent: "single serotype call, same-serogroup alternatives, or a known special call",
    matcher: is_in_silico_serotype,
};

pub static WGS_MIC: ValuePattern = ValuePattern {
    name: "wgs_mic",
    intent: "predicted MIC, bound or range, or NA, FLAG, NF",
    matcher: is_wgs_mic,
};

pub static PBP_TYPE_TRIPLE: ValuePattern = ValuePattern {
    name: "pbp_type_triple",
    intent: "three PBP types (0-999, NEW, NF, ERROR) joined by __",
    matcher: is_pbp_type_triple,
};
