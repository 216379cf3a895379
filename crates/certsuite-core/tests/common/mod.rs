use certsuite_core::model::{
    Context, DeclaredMember, GlobalObjectSet, InformativeRecord, InformativeRecords,
    InterfaceDeclaration, MemberKind, ObservedInterface, ObservedMember, ProbeOutcome,
    ScriptBundle,
};
use std::io::Write;
use std::path::Path;

/// Build a bundle from `(path, text)` pairs
#[allow(dead_code)]
pub fn bundle(files: &[(&str, &str)]) -> ScriptBundle {
    files
        .iter()
        .map(|(path, text)| (path.to_string(), text.as_bytes().to_vec()))
        .collect()
}

#[allow(dead_code)]
pub fn globals(paths: &[&str]) -> GlobalObjectSet {
    paths.iter().copied().collect()
}

#[allow(dead_code)]
pub fn declared_attr(name: &str, context: Context) -> DeclaredMember {
    DeclaredMember {
        name: name.to_string(),
        kind: MemberKind::Attribute,
        arguments: Vec::new(),
        context,
    }
}

#[allow(dead_code)]
pub fn declared_op(name: &str, arguments: &[&str], context: Context) -> DeclaredMember {
    DeclaredMember {
        name: name.to_string(),
        kind: MemberKind::Operation,
        arguments: arguments.iter().map(|a| a.to_string()).collect(),
        context,
    }
}

#[allow(dead_code)]
pub fn interface(name: &str, context: Context, members: Vec<DeclaredMember>) -> InterfaceDeclaration {
    InterfaceDeclaration {
        name: name.to_string(),
        parent: None,
        context,
        members,
    }
}

/// Observed attribute whose probe passed
#[allow(dead_code)]
pub fn observed_attr(name: &str) -> ObservedMember {
    ObservedMember {
        name: name.to_string(),
        kind: MemberKind::Attribute,
        arguments: Vec::new(),
        probe: Some(ProbeOutcome::pass()),
    }
}

#[allow(dead_code)]
pub fn observed(name: &str, members: Vec<ObservedMember>) -> ObservedInterface {
    ObservedInterface {
        name: name.to_string(),
        probe: Some(ProbeOutcome::pass()),
        members,
    }
}

/// Every required informative record, filled with placeholder data
#[allow(dead_code)]
pub fn full_informative() -> InformativeRecords {
    InformativeRecords {
        omni_result: None,
        application_ini: Some(InformativeRecord::text("[App]\nVersion=32.0\n")),
        headers: Some(InformativeRecord(serde_json::json!({"User-Agent": "Mozilla/5.0"}))),
        buildprops: Some(InformativeRecord::text("ro.build.version.sdk=19\n")),
        kernel_version: Some(InformativeRecord::text("Linux version 3.4.0\n")),
        processes_running: Some(InformativeRecord::text("b2g\nrild\n")),
    }
}

/// Write a zip archive holding `(path, text)` entries
#[allow(dead_code)]
pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, text) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(text.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}
