//! Expected column layouts of the database tables.

pub const METADATA_V1: &[&str] = &[
    "Sample_name", "Public_name", "Study_name", "Selection_random", "Continent", "Country",
    "Region", "City", "Facility_where_collected", "Submitting_institution", "Month", "Year",
    "Gender", "Age_years", "Age_months", "Age_days", "Clinical_manifestation", "Source",
    "HIV_status", "Underlying_conditions", "Phenotypic_serotype_method", "Phenotypic_serotype",
    "Sequence_Type", "aroE", "gdh", "gki", "recP", "spi", "xpt", "ddl",
    "AST_method_Penicillin", "Penicillin", "AST_method_Amoxicillin", "Amoxicillin",
    "AST_method_Cefotaxime", "Cefotaxime", "AST_method_Ceftriaxone", "Ceftriaxone",
    "AST_method_Cefuroxime", "Cefuroxime", "AST_method_Meropenem", "Meropenem",
    "AST_method_Erythromycin", "Erythromycin", "AST_method_Clindamycin", "Clindamycin",
    "AST_method_COT", "COT", "AST_method_Vancomycin", "Vancomycin", "AST_method_Linezolid",
    "Linezolid", "AST_method_Ciprofloxacin", "Ciprofloxacin", "AST_method_Chloramphenicol",
    "Chloramphenicol", "AST_method_Tetracycline", "Tetracycline", "AST_method_Levofloxacin",
    "Levofloxacin", "AST_method_Synercid", "Synercid", "AST_method_Rifampin", "Rifampin",
    "Comments",
];

pub const METADATA_V2: &[&str] = &[
    "Sample_name", "Public_name", "Study_name", "Selection_random", "Country", "Region", "City",
    "Facility_where_collected", "Submitting_institution", "Month", "Year", "Gender", "Age_years",
    "Age_months", "Age_days", "Clinical_manifestation", "Source", "HIV_status",
    "Underlying_conditions", "Phenotypic_serotype_method", "Phenotypic_serotype",
    "Sequence_Type", "aroE", "gdh", "gki", "recP", "spi", "xpt", "ddl",
    "AST_method_Penicillin", "Penicillin", "AST_method_Amoxicillin", "Amoxicillin",
    "AST_method_Cefotaxime", "Cefotaxime", "AST_method_Ceftriaxone", "Ceftriaxone",
    "AST_method_Cefuroxime", "Cefuroxime", "AST_method_Meropenem", "Meropenem",
    "AST_method_Erythromycin", "Erythromycin", "AST_method_Clindamycin", "Clindamycin",
    "AST_method_COT", "COT", "AST_method_Vancomycin", "Vancomycin", "AST_method_Linezolid",
    "Linezolid", "AST_method_Ciprofloxacin", "Ciprofloxacin", "AST_method_Chloramphenicol",
    "Chloramphenicol", "AST_method_Tetracycline", "Tetracycline", "AST_method_Levofloxacin",
    "Levofloxacin", "AST_method_Synercid", "Synercid", "AST_method_Rifampin", "Rifampin",
    "AST_method_Oxacillin", "Oxacillin", "Comments", "Accession_number",
];

pub const QC_V1: &[&str] = &[
    "Lane_id", "Streptococcus_pneumoniae", "Total_length", "No_of_contigs", "Genome_covered",
    "Depth_of_coverage", "Proportion_of_Het_SNPs", "QC", "Supplier_name", "Hetsites_50bp",
];

pub const QC_V2: &[&str] = &[
    "Lane_id", "Public_name", "Assembler", "Streptococcus_pneumoniae", "Total_length",
    "No_of_contigs", "Genome_covered", "Depth_of_coverage", "Proportion_of_Het_SNPs", "QC",
    "Supplier_name", "Hetsites_50bp",
];

/// Columns shared by both analysis layouts after the identifier block.
const ANALYSIS_TAIL: [&str; 88] = [
    "In_silico_ST", "aroE", "gdh", "gki", "recP", "spi", "xpt", "ddl", "GPSC",
    "GPSC__colour", "In_silico_serotype", "In_silico_serotype__colour", "pbp1a", "pbp2b",
    "pbp2x", "WGS_PEN", "WGS_PEN_SIR_Meningitis", "WGS_PEN_SIR_Nonmeningitis", "WGS_AMO",
    "WGS_AMO_SIR", "WGS_MER", "WGS_MER_SIR", "WGS_TAX", "WGS_TAX_SIR_Meningitis",
    "WGS_TAX_SIR_Nonmeningitis", "WGS_CFT", "WGS_CFT_SIR_Meningitis",
    "WGS_CFT_SIR_Nonmeningitis", "WGS_CFX", "WGS_CFX_SIR", "WGS_ERY", "WGS_ERY_SIR",
    "WGS_CLI", "WGS_CLI_SIR", "WGS_SYN", "WGS_SYN_SIR", "WGS_LZO", "WGS_LZO_SIR",
    "WGS_ERY_CLI", "WGS_COT", "WGS_COT_SIR", "WGS_TET", "WGS_TET_SIR", "WGS_DOX",
    "WGS_DOX_SIR", "WGS_LFX", "WGS_LFX_SIR", "WGS_CHL", "WGS_CHL_SIR", "WGS_RIF",
    "WGS_RIF_SIR", "WGS_VAN", "WGS_VAN_SIR", "EC", "Cot", "Tet__autocolour",
    "FQ__autocolour", "Other", "PBP1A_2B_2X__autocolour",
    "WGS_PEN_SIR_Meningitis__colour", "WGS_PEN_SIR_Nonmeningitis__colour",
    "WGS_AMO_SIR__colour", "WGS_MER_SIR__colour", "WGS_TAX_SIR_Meningitis__colour",
    "WGS_TAX_SIR_Nonmeningitis__colour", "WGS_CFT_SIR_Meningitis__colour",
    "WGS_CFT_SIR_Nonmeningitis__colour", "WGS_CFX_SIR__colour", "WGS_ERY_SIR__colour",
    "WGS_CLI_SIR__colour", "WGS_SYN_SIR__colour", "WGS_LZO_SIR__colour",
    "WGS_COT_SIR__colour", "WGS_TET_SIR__colour", "WGS_DOX_SIR__colour",
    "WGS_LFX_SIR__colour", "WGS_CHL_SIR__colour", "WGS_RIF_SIR__colour",
    "WGS_VAN_SIR__colour", "ermB", "ermB__colour", "mefA", "mefA__colour",
    "folA_I100L", "folA_I100L__colour", "folP__autocolour", "cat", "cat__colour",
];

const fn concat<const A: usize, const B: usize, const N: usize>(
    head: [&'static str; A],
    tail: [&'static str; B],
) -> [&'static str; N] {
    let mut out = [""; N];
    let mut i = 0;
    while i < A {
        out[i] = head[i];
        i += 1;
    }
    let mut j = 0;
    while j < B {
        out[A + j] = tail[j];
        j += 1;
    }
    out
}

const ANALYSIS_V1_ARRAY: [&str; 96] = concat(
    [
        "Lane_id", "Sample", "Public_name", "ERR", "ERS", "No_of_genome", "Duplicate", "Paper_1",
    ],
    ANALYSIS_TAIL,
);

const ANALYSIS_V2_ARRAY: [&str; 95] = concat(
    [
        "Lane_id", "Sanger_sample_id", "Public_name", "ERR", "ERS", "No_of_genome", "Duplicate",
    ],
    ANALYSIS_TAIL,
);

pub const ANALYSIS_V1: &[&str] = &ANALYSIS_V1_ARRAY;
pub const ANALYSIS_V2: &[&str] = &ANALYSIS_V2_ARRAY;

pub const ANTIBIOTICS_V1: &[&str] = &[
    "Penicillin", "Amoxicillin", "Cefotaxime", "Ceftriaxone", "Cefuroxime", "Meropenem",
    "Erythromycin", "Clindamycin", "COT", "Vancomycin", "Linezolid", "Ciprofloxacin",
    "Chloramphenicol", "Tetracycline", "Levofloxacin", "Synercid", "Rifampin",
];

pub const ANTIBIOTICS_V2: &[&str] = &[
    "Penicillin", "Amoxicillin", "Cefotaxime", "Ceftriaxone", "Cefuroxime", "Meropenem",
    "Erythromycin", "Clindamycin", "COT", "Vancomycin", "Linezolid", "Ciprofloxacin",
    "Chloramphenicol", "Tetracycline", "Levofloxacin", "Synercid", "Rifampin", "Oxacillin",
];

pub const METADATA_CASE_ONLY_V1: &[&str] = &[
    "Study_name", "Region", "City", "Facility_where_collected", "Submitting_institution",
    "Underlying_conditions", "Phenotypic_serotype_method", "AST_method_Penicillin",
    "AST_method_Amoxicillin", "AST_method_Cefotaxime", "AST_method_Ceftriaxone",
    "AST_method_Cefuroxime", "AST_method_Meropenem", "AST_method_Erythromycin",
    "AST_method_Clindamycin", "AST_method_COT", "AST_method_Vancomycin", "AST_method_Linezolid",
    "AST_method_Ciprofloxacin", "AST_method_Chloramphenicol", "AST_method_Tetracycline",
    "AST_method_Levofloxacin", "AST_method_Synercid", "AST_method_Rifampin",
];

pub const METADATA_CASE_ONLY_V2: &[&str] = &[
    "Study_name", "Region", "City", "Facility_where_collected", "Submitting_institution",
    "Underlying_conditions", "Phenotypic_serotype_method", "AST_method_Penicillin",
    "AST_method_Amoxicillin", "AST_method_Cefotaxime", "AST_method_Ceftriaxone",
    "AST_method_Cefuroxime", "AST_method_Meropenem", "AST_method_Erythromycin",
    "AST_method_Clindamycin", "AST_method_COT", "AST_method_Vancomycin", "AST_method_Linezolid",
    "AST_method_Ciprofloxacin", "AST_method_Chloramphenicol", "AST_method_Tetracycline",
    "AST_method_Levofloxacin", "AST_method_Synercid", "AST_method_Rifampin",
    "AST_method_Oxacillin", "Accession_number",
];

pub const MLST_GENES: &[&str] = &["aroE", "gdh", "gki", "recP", "spi", "xpt", "ddl"];

pub const PBP_GENES: &[&str] = &["pbp1a", "pbp2b", "pbp2x"];

pub const POS_NEG_GENES: &[&str] = &["ermB", "mefA", "folA_I100L", "cat"];

pub const ANALYSIS_CASE_ONLY: &[&str] =
    &["Cot", "Tet__autocolour", "FQ__autocolour", "folP__autocolour", "Other"];

pub const COLOUR_V1: &[&str] = &[
    "GPSC__colour", "In_silico_serotype__colour", "ermB__colour", "mefA__colour",
    "folA_I100L__colour", "cat__colour",
];

pub const COLOUR_V2: &[&str] = &["ermB__colour", "mefA__colour", "folA_I100L__colour", "cat__colour"];

const SIR_COLOURS: [&str; 20] = [
    "WGS_PEN_SIR_Meningitis__colour", "WGS_PEN_SIR_Nonmeningitis__colour", "WGS_AMO_SIR__colour",
    "WGS_MER_SIR__colour", "WGS_TAX_SIR_Meningitis__colour", "WGS_TAX_SIR_Nonmeningitis__colour",
    "WGS_CFT_SIR_Meningitis__colour", "WGS_CFT_SIR_Nonmeningitis__colour", "WGS_CFX_SIR__colour",
    "WGS_ERY_SIR__colour", "WGS_CLI_SIR__colour", "WGS_SYN_SIR__colour", "WGS_LZO_SIR__colour",
    "WGS_COT_SIR__colour", "WGS_TET_SIR__colour", "WGS_DOX_SIR__colour", "WGS_LFX_SIR__colour",
    "WGS_CHL_SIR__colour", "WGS_RIF_SIR__colour", "WGS_VAN_SIR__colour",
];

const COLOUR_TRANSPARENT_V2_ARRAY: [&str; 22] =
    concat(["GPSC__colour", "In_silico_serotype__colour"], SIR_COLOURS);

pub const COLOUR_TRANSPARENT_V1: &[&str] = &SIR_COLOURS;
pub const COLOUR_TRANSPARENT_V2: &[&str] = &COLOUR_TRANSPARENT_V2_ARRAY;

pub const WGS_V1: &[&str] = &[
    "WGS_PEN", "WGS_AMO", "WGS_MER", "WGS_TAX", "WGS_CFT", "WGS_CFX", "WGS_ERY", "WGS_CLI",
    "WGS_SYN", "WGS_LZO", "WGS_COT", "WGS_TET", "WGS_DOX", "WGS_LFX", "WGS_CHL", "WGS_RIF",
    "WGS_VAN",
];

pub const WGS_V2: &[&str] = &[
    "WGS_PEN", "WGS_AMO", "WGS_MER", "WGS_TAX", "WGS_CFT", "WGS_CFX", "WGS_ERY", "WGS_CLI",
    "WGS_COT", "WGS_TET", "WGS_DOX", "WGS_LFX", "WGS_CHL", "WGS_RIF", "WGS_VAN",
];

pub const WGS_SIR_V1: &[&str] = &[
    "WGS_PEN_SIR_Meningitis", "WGS_PEN_SIR_Nonmeningitis", "WGS_AMO_SIR", "WGS_MER_SIR",
    "WGS_TAX_SIR_Meningitis", "WGS_TAX_SIR_Nonmeningitis", "WGS_CFT_SIR_Meningitis",
    "WGS_CFT_SIR_Nonmeningitis", "WGS_CFX_SIR", "WGS_ERY_SIR", "WGS_CLI_SIR", "WGS_SYN_SIR",
    "WGS_LZO_SIR", "WGS_COT_SIR", "WGS_TET_SIR", "WGS_DOX_SIR", "WGS_LFX_SIR", "WGS_CHL_SIR",
    "WGS_RIF_SIR", "WGS_VAN_SIR",
];

pub const WGS_SIR_V2: &[&str] = &[
    "WGS_PEN_SIR_Meningitis", "WGS_PEN_SIR_Nonmeningitis", "WGS_AMO_SIR", "WGS_MER_SIR",
    "WGS_TAX_SIR_Meningitis", "WGS_TAX_SIR_Nonmeningitis", "WGS_CFT_SIR_Meningitis",
    "WGS_CFT_SIR_Nonmeningitis", "WGS_CFX_SIR",
];

pub const ARIBA_SIR_V2: &[&str] = &[
    "WGS_ERY_SIR", "WGS_CLI_SIR", "WGS_COT_SIR", "WGS_TET_SIR", "WGS_DOX_SIR", "WGS_LFX_SIR",
    "WGS_CHL_SIR", "WGS_RIF_SIR", "WGS_VAN_SIR",
];

/// Columns no longer produced in V2 that must hold only the placeholder.
pub const RETIRED_V2: &[&str] = &["WGS_SYN", "WGS_LZO", "WGS_SYN_SIR", "WGS_LZO_SIR"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn distinct(columns: &[&str]) -> bool {
        columns.iter().collect::<HashSet<_>>().len() == columns.len()
    }

    #[test]
    fn test_layouts_have_no_repeated_columns() {
        for layout in [METADATA_V1, METADATA_V2, QC_V1, QC_V2, ANALYSIS_V1, ANALYSIS_V2] {
            assert!(distinct(layout));
        }
    }

    #[test]
    fn test_analysis_layouts() {
        assert_eq!(ANALYSIS_V1[1], "Sample");
        assert_eq!(ANALYSIS_V2[1], "Sanger_sample_id");
        assert!(ANALYSIS_V1.contains(&"Paper_1"));
        assert!(!ANALYSIS_V2.contains(&"Paper_1"));
        assert_eq!(ANALYSIS_V2.last(), Some(&"cat__colour"));
    }

    #[test]
    fn test_transparent_colours_v2_include_lineage() {
        assert!(COLOUR_TRANSPARENT_V2.contains(&"GPSC__colour"));
        assert!(!COLOUR_TRANSPARENT_V1.contains(&"GPSC__colour"));
    }
}
