//! End-to-end tests of the gpsdb binary.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn gpsdb() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gpsdb"))
}

#[test]
fn test_non_csv_table_is_rejected() {
    let output = gpsdb()
        .args(["process", "--metadata", "table1.tsv", "--validate-only"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("table1.tsv"));
}

#[test]
fn test_missing_reference_data_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let output = gpsdb()
        .current_dir(dir.path())
        .args(["process", "--validate-only"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_integrate_appends_lanes() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("table2.csv"),
        "Lane_id,Public_name,Assembler,Streptococcus_pneumoniae,Total_length,No_of_contigs,\
         Genome_covered,Depth_of_coverage,Proportion_of_Het_SNPs,QC,Supplier_name,Hetsites_50bp\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "Sample_ID,S.Pneumo_%,Assembly_Length,Contigs#,Ref_Cov_%,Seq_Depth,Overall_QC,Het-SNP#\n\
         L1,95.1,2100000,80,91.2,55.3,PASS,4\n",
    )
    .unwrap();
    fs::write(dir.path().join("info.csv"), "Lane_id,Public_name\nL1,GPS_1\n").unwrap();

    let output = gpsdb()
        .current_dir(dir.path())
        .args(["integrate", "-r", "results.csv", "-i", "info.csv", "-d", "."])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let table2 = fs::read_to_string(dir.path().join("table2.csv")).unwrap();
    assert!(table2.contains("L1,GPS_1,SHOVILL,95.1,2100000,80,91.2,55.3,_,PASS,_,4"));
}
