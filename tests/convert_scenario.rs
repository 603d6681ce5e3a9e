//! End-to-end conversion through walk -> select -> convert, on real directories.

use assert_fs::TempDir;
use std::fs;
use std::path::PathBuf;

use text_encode_changer::{
    CancelFlag, ConvertRequest, EncodingType, NoProgress, OverwriteMode, SearchCondition,
    TermType, TransferMode, apply_summary, convert_files, encode, select_for_conversion,
    walk,
};

fn request(
    source: PathBuf,
    dest: Option<PathBuf>,
    transfer_mode: TransferMode,
    overwrite_mode: OverwriteMode,
    files: Vec<text_encode_changer::SelectedFile>,
) -> ConvertRequest {
    ConvertRequest {
        source_dir: source,
        dest_dir: dest,
        transfer_mode,
        overwrite_mode,
        target_encoding: EncodingType::Utf8,
        target_term: TermType::Lf,
        files,
    }
}

#[test]
fn replace_overwrite_converts_only_the_mismatched_file() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let a_bytes = b"first\nsecond\n".to_vec();
    fs::write(root.join("a.txt"), &a_bytes).unwrap();
    fs::write(
        root.join("b.txt"),
        encode("日本語\r\nテキスト\r\n", EncodingType::Windows31J).unwrap(),
    )
    .unwrap();

    let cond = SearchCondition::new(&root, false, "*.txt");
    let mut files = walk(&cond, &CancelFlag::new(), &NoProgress).unwrap();
    assert_eq!(files.len(), 2);

    let selection = select_for_conversion(&files, EncodingType::Utf8, TermType::Lf);
    assert_eq!(selection.len(), 1);
    assert_eq!(selection[0].relative, PathBuf::from("b.txt"));
    assert_eq!(selection[0].encoding, Some(EncodingType::Windows31J));

    let req = request(
        root.clone(),
        None,
        TransferMode::Replace,
        OverwriteMode::Overwrite,
        selection,
    );
    let summary = convert_files(&req, &CancelFlag::new(), &NoProgress).unwrap();
    assert_eq!(summary.converted, vec![PathBuf::from("b.txt")]);

    assert_eq!(
        fs::read(root.join("b.txt")).unwrap(),
        "日本語\nテキスト\n".as_bytes()
    );
    assert_eq!(fs::read(root.join("a.txt")).unwrap(), a_bytes);

    apply_summary(&mut files, &summary, EncodingType::Utf8, TermType::Lf);
    assert!(select_for_conversion(&files, EncodingType::Utf8, TermType::Lf).is_empty());
}

#[test]
fn copy_into_destination_tree_with_backup() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let src = root.join("src");
    let dest = root.join("dest");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::create_dir_all(dest.join("nested")).unwrap();
    let original = encode("ユーロ\r\n", EncodingType::EucJp).unwrap();
    fs::write(src.join("nested/x.txt"), &original).unwrap();
    fs::write(dest.join("nested/x.txt"), b"previous").unwrap();

    let files = walk(&SearchCondition::new(&src, true, "*.txt"), &CancelFlag::new(), &NoProgress).unwrap();
    let selection = select_for_conversion(&files, EncodingType::Utf8, TermType::Lf);
    let req = request(
        src.clone(),
        Some(dest.clone()),
        TransferMode::Copy,
        OverwriteMode::CreateBackup,
        selection,
    );
    let summary = convert_files(&req, &CancelFlag::new(), &NoProgress).unwrap();
    assert_eq!(summary.converted_count(), 1);

    assert_eq!(fs::read(src.join("nested/x.txt")).unwrap(), original);
    assert_eq!(fs::read_to_string(dest.join("nested/x.txt")).unwrap(), "ユーロ\n");
    assert_eq!(fs::read(dest.join("nested/x.txt.bak")).unwrap(), b"previous");
}

#[test]
fn move_creates_parents_and_removes_source() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let src = root.join("src");
    fs::create_dir_all(src.join("deep/er")).unwrap();
    fs::write(
        src.join("deep/er/m.txt"),
        encode("moved\r\n", EncodingType::Utf16BomLe).unwrap(),
    )
    .unwrap();
    let dest = root.join("out");

    let files = walk(&SearchCondition::new(&src, true, "*.txt"), &CancelFlag::new(), &NoProgress).unwrap();
    let req = request(
        src.clone(),
        Some(dest.clone()),
        TransferMode::Move,
        OverwriteMode::Overwrite,
        select_for_conversion(&files, EncodingType::Utf8, TermType::Lf),
    );
    convert_files(&req, &CancelFlag::new(), &NoProgress).unwrap();

    assert!(!src.join("deep/er/m.txt").exists());
    assert_eq!(fs::read_to_string(dest.join("deep/er/m.txt")).unwrap(), "moved\n");
}

#[test]
fn skip_leaves_both_files_identical() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let src = root.join("src");
    let dest = root.join("dest");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dest).unwrap();
    let src_bytes = encode("元\r\n", EncodingType::Windows31J).unwrap();
    fs::write(src.join("s.txt"), &src_bytes).unwrap();
    fs::write(dest.join("s.txt"), b"keep me").unwrap();

    let files = walk(&SearchCondition::new(&src, false, "*.txt"), &CancelFlag::new(), &NoProgress).unwrap();
    let req = request(
        src.clone(),
        Some(dest.clone()),
        TransferMode::Copy,
        OverwriteMode::Skip,
        select_for_conversion(&files, EncodingType::Utf8, TermType::Lf),
    );
    let summary = convert_files(&req, &CancelFlag::new(), &NoProgress).unwrap();
    assert_eq!(summary.converted_count(), 0);
    assert_eq!(summary.skipped, vec![PathBuf::from("s.txt")]);
    assert_eq!(fs::read(src.join("s.txt")).unwrap(), src_bytes);
    assert_eq!(fs::read(dest.join("s.txt")).unwrap(), b"keep me");
}

#[test]
fn unrepresentable_text_aborts_without_writing() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    fs::write(root.join("e.txt"), "smile 😀\n").unwrap();

    let files = walk(&SearchCondition::new(&root, false, "*.txt"), &CancelFlag::new(), &NoProgress).unwrap();
    let mut req = request(
        root.clone(),
        None,
        TransferMode::Replace,
        OverwriteMode::Overwrite,
        select_for_conversion(&files, EncodingType::EucJp, TermType::Unknown),
    );
    req.target_encoding = EncodingType::EucJp;
    req.target_term = TermType::Unknown;
    let err = convert_files(&req, &CancelFlag::new(), &NoProgress).unwrap_err();
    assert!(format!("{err:#}").contains("e.txt"));
    assert_eq!(fs::read_to_string(root.join("e.txt")).unwrap(), "smile 😀\n");
}
