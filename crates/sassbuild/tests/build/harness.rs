//! A throwaway project directory with a `src/` and `out/` tree.

use camino::{Utf8Path, Utf8PathBuf};
use sassbuild::{
    BuildError, BuildReport, ChangeRecord, ChangeSet, CompilationOptions, GrassBackend,
    IncrementalController, OutputLayout,
};

pub struct TestProject {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
    pub options: CompilationOptions,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("sassbuild-test-")
            .tempdir()
            .expect("create temp project");
        let root = Utf8Path::from_path(dir.path())
            .expect("temp dir is UTF-8")
            .to_path_buf();
        Self {
            _dir: dir,
            root,
            options: CompilationOptions::default(),
        }
    }

    pub fn src(&self, rel: &str) -> Utf8PathBuf {
        self.root.join("src").join(rel)
    }

    pub fn out(&self, rel: &str) -> Utf8PathBuf {
        self.root.join("out").join(rel)
    }

    /// Write a source file, creating directories as needed
    pub fn write_src(&self, rel: &str, content: &str) -> Utf8PathBuf {
        let path = self.src(rel);
        fs_err::create_dir_all(path.parent().unwrap()).unwrap();
        fs_err::write(&path, content).unwrap();
        path
    }

    pub fn remove_src(&self, rel: &str) -> Utf8PathBuf {
        let path = self.src(rel);
        fs_err::remove_file(&path).unwrap();
        path
    }

    /// Drop a file into the output tree
    pub fn write_out(&self, rel: &str, content: &str) {
        let path = self.out(rel);
        fs_err::create_dir_all(path.parent().unwrap()).unwrap();
        fs_err::write(&path, content).unwrap();
    }

    pub fn read_out(&self, rel: &str) -> String {
        fs_err::read_to_string(self.out(rel)).unwrap()
    }

    pub fn controller(&self) -> IncrementalController<GrassBackend> {
        IncrementalController::new(
            OutputLayout::new(self.root.join("src"), self.root.join("out")),
            GrassBackend,
        )
    }

    pub fn build(&self, changes: ChangeSet) -> Result<BuildReport, BuildError> {
        self.controller().build(changes, &self.options)
    }

    pub fn added(&self, rel: &str) -> ChangeRecord {
        ChangeRecord::added(self.src(rel))
    }

    pub fn modified(&self, rel: &str) -> ChangeRecord {
        ChangeRecord::modified(self.src(rel))
    }

    pub fn removed(&self, rel: &str) -> ChangeRecord {
        ChangeRecord::removed(self.src(rel))
    }
}
