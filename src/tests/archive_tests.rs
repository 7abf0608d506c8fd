use super::*;
use std::io::Write;

#[test]
fn safe_join_accepts_nested_relative_path() {
    let dest = Path::new("/tmp/extract-dest");
    let joined = safe_join(dest, Path::new("sub/dir/file.txt")).expect("normal path must be accepted");
    assert_eq!(joined, dest.join("sub").join("dir").join("file.txt"));
}

#[test]
fn safe_join_rejects_parent_dir_component() {
    let dest = Path::new("/tmp/extract-dest");
    let err = safe_join(dest, Path::new("../escape.txt")).expect_err("must reject ..");
    assert!(matches!(err, LastVersionError::PathTraversal(_)));
}

#[test]
fn safe_join_rejects_absolute_path() {
    let dest = Path::new("/tmp/extract-dest");
    let err = safe_join(dest, Path::new("/etc/passwd")).expect_err("must reject absolute paths");
    assert!(matches!(err, LastVersionError::PathTraversal(_)));
}

#[test]
fn extract_rejects_unknown_extension() {
    let staging = tempfile::tempdir().expect("tempdir");
    let bogus = staging.path().join("archive.rar");
    File::create(&bogus).expect("create bogus archive");
    let dest = staging.path().join("out");
    let err = extract(&bogus, "archive.rar", &dest).expect_err("unsupported format must error");
    assert!(matches!(err, LastVersionError::Other(_)));
}

#[test]
fn extract_zip_writes_nested_file_contents() {
    let staging = tempfile::tempdir().expect("tempdir");
    let archive_path = staging.path().join("source.zip");
    {
        let file = File::create(&archive_path).expect("create zip");
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("sub/dir/hello.txt", options).expect("start_file");
        writer.write_all(b"hello from zip").expect("write entry");
        writer.finish().expect("finish zip");
    }

    let dest = staging.path().join("out");
    extract_zip(&archive_path, &dest).expect("extraction must succeed");

    let extracted = dest.join("sub").join("dir").join("hello.txt");
    let contents = fs::read_to_string(&extracted).expect("extracted file must exist");
    assert_eq!(contents, "hello from zip");
}

#[test]
fn extract_tar_gz_writes_nested_file_contents() {
    let staging = tempfile::tempdir().expect("tempdir");
    let archive_path = staging.path().join("source.tar.gz");
    {
        let file = File::create(&archive_path).expect("create tar.gz");
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let data = b"hello from tar";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "sub/dir/hello.txt", &data[..])
            .expect("append entry");
        builder.into_inner().expect("finish tar").finish().expect("finish gzip");
    }

    let dest = staging.path().join("out");
    extract_tar_gz(&archive_path, &dest).expect("extraction must succeed");

    let extracted = dest.join("sub").join("dir").join("hello.txt");
    let contents = fs::read_to_string(&extracted).expect("extracted file must exist");
    assert_eq!(contents, "hello from tar");
}

#[test]
fn extract_dispatches_by_extension() {
    let staging = tempfile::tempdir().expect("tempdir");
    let archive_path = staging.path().join("source.zip");
    {
        let file = File::create(&archive_path).expect("create zip");
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("a.txt", zip::write::SimpleFileOptions::default())
            .expect("start_file");
        writer.write_all(b"content").expect("write entry");
        writer.finish().expect("finish zip");
    }

    let dest = staging.path().join("out");
    extract(&archive_path, "source.zip", &dest).expect("dispatch to zip extractor must succeed");
    assert!(dest.join("a.txt").exists());
}
