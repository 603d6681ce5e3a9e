//! Verify XML config is parsed and used without touching user state.

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use text_encode_changer::{
    EncodingType, LogLevel, OverwriteMode, TermType, TransferMode, load_config_from_xml_path,
};

#[test]
fn reads_config_xml_and_applies_values() {
    let td = tempdir().expect("create tempdir");
    let cfg_path = td.path().join("config.xml");
    let log_file = td.path().join("tec.log");

    let xml = format!(
        r#"
<config>
  <target_encoding>EUC_JP</target_encoding>
  <terminator>CRLF</terminator>
  <transfer_mode>replace</transfer_mode>
  <overwrite_mode>skip</overwrite_mode>
  <pattern>*.csv;*.tsv</pattern>
  <recursive>false</recursive>
  <log_level>info</log_level>
  <log_file>{}</log_file>
</config>
"#,
        log_file.display()
    );
    fs::write(&cfg_path, xml).expect("write config.xml");

    let cfg = load_config_from_xml_path(&cfg_path).expect("load_config_from_xml_path");
    assert_eq!(cfg.target_encoding, EncodingType::EucJp);
    assert_eq!(cfg.target_term, TermType::CrLf);
    assert_eq!(cfg.transfer_mode, TransferMode::Replace);
    assert_eq!(cfg.overwrite_mode, OverwriteMode::Skip);
    assert_eq!(cfg.pattern, "*.csv;*.tsv");
    assert!(!cfg.recursive);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file, Some(log_file));
}

#[test]
fn trims_whitespace_and_ignores_blank_values() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let xml = r#"<config>
  <target_encoding>   Windows31J
  </target_encoding>
  <pattern>   </pattern>
  <log_level>  debug  </log_level>
  <log_file>  </log_file>
</config>"#;
    fs::write(&cfg_path, xml).unwrap();
    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg.target_encoding, EncodingType::Windows31J);
    assert_eq!(cfg.pattern, "*.txt");
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.log_file, None::<PathBuf>);
}

#[test]
fn missing_elements_keep_defaults() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><recursive>true</recursive></config>").unwrap();
    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg, text_encode_changer::Config::default());
}
