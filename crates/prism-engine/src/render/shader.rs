use std::fmt;
use std::path::{Path, PathBuf};

use super::error::PipelineError;

/// Programmable pipeline stage an entry point belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryPoint {
    pub name: String,
    pub stage: ShaderStage,
}

/// WGSL source loaded from disk plus the entry points it declares.
///
/// Entry points are discovered by scanning for the render stage attributes
/// (`@vertex`, `@fragment`) followed by a `fn` declaration, outside comments.
/// Full validation is left to the GPU backend at pipeline creation.
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    origin: PathBuf,
    source: String,
    entry_points: Vec<EntryPoint>,
}

impl ShaderLibrary {
    /// Reads a WGSL library from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|e| PipelineError::LibraryUnreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        log::debug!("loaded shader library {} ({} bytes)", path.display(), source.len());
        Ok(Self::from_source(path, source))
    }

    /// Wraps in-memory WGSL. `origin` is only used in diagnostics.
    pub fn from_source(origin: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let source = source.into();
        let entry_points = scan_entry_points(&source);
        Self {
            origin: origin.into(),
            source,
            entry_points,
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    /// Resolves the entry point `name` for `stage`.
    pub fn function(
        &self,
        name: &str,
        stage: ShaderStage,
    ) -> Result<ShaderFunction<'_>, PipelineError> {
        let found = self
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage);

        match found {
            Some(ep) => Ok(ShaderFunction { library: self, entry: ep }),
            None => Err(PipelineError::MissingEntryPoint {
                name: name.to_string(),
                stage,
            }),
        }
    }
}

/// A resolved entry point inside a [`ShaderLibrary`].
#[derive(Debug, Copy, Clone)]
pub struct ShaderFunction<'a> {
    library: &'a ShaderLibrary,
    entry: &'a EntryPoint,
}

impl<'a> ShaderFunction<'a> {
    pub fn library(&self) -> &'a ShaderLibrary {
        self.library
    }

    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    pub fn stage(&self) -> ShaderStage {
        self.entry.stage
    }
}

fn scan_entry_points(source: &str) -> Vec<EntryPoint> {
    let code = strip_comments(source);

    let mut found = Vec::new();
    let mut pending: Option<ShaderStage> = None;
    let mut expect_name = false;

    let tokens = code
        .split(|c: char| c.is_whitespace() || c == '(')
        .filter(|t| !t.is_empty());

    for token in tokens {
        if expect_name {
            expect_name = false;
            if let Some(stage) = pending.take() {
                found.push(EntryPoint {
                    name: token.to_string(),
                    stage,
                });
            }
            continue;
        }

        match token {
            "@vertex" => pending = Some(ShaderStage::Vertex),
            "@fragment" => pending = Some(ShaderStage::Fragment),
            "@compute" => pending = None,
            "fn" => expect_name = true,
            _ => {}
        }
    }

    found
}

/// Removes `//` line comments and `/* */` block comments. Block comments
/// nest in WGSL and are replaced by a single space.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut depth = 0usize;
    let mut in_line = false;

    while let Some(c) = chars.next() {
        if in_line {
            if c == '\n' {
                in_line = false;
                out.push(c);
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('/', Some('*')) => {
                chars.next();
                depth += 1;
                out.push(' ');
            }
            ('*', Some('/')) if depth > 0 => {
                chars.next();
                depth -= 1;
                out.push(' ');
            }
            ('/', Some('/')) if depth == 0 => {
                chars.next();
                in_line = true;
            }
            ('\n', _) => out.push(c),
            _ if depth > 0 => {}
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOMETRY: &str = r#"
struct VertexIn {
    @location(0) position: vec4<f32>,
    @location(1) color: vec4<f32>,
};

fn helper(x: f32) -> f32 { return x; }

@vertex
fn vertex_main(input: VertexIn) -> @builtin(position) vec4<f32> {
    return input.position;
}

// @fragment fn commented_out() {}
@fragment fn fragment_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}

/* @vertex fn ghost() {}
   /* nested */ @fragment fn still_commented() {}
*/

@compute @workgroup_size(64)
fn cs_main() {}
"#;

    #[test]
    fn scans_stage_entry_points_only() {
        let lib = ShaderLibrary::from_source("geometry.wgsl", GEOMETRY);
        let names: Vec<_> = lib.entry_points().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["vertex_main", "fragment_main"]);
    }

    #[test]
    fn resolves_function_by_name_and_stage() {
        let lib = ShaderLibrary::from_source("geometry.wgsl", GEOMETRY);
        let vs = lib.function("vertex_main", ShaderStage::Vertex).unwrap();
        assert_eq!(vs.name(), "vertex_main");
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(vs.library().origin(), Path::new("geometry.wgsl"));
    }

    #[test]
    fn wrong_stage_is_missing() {
        let lib = ShaderLibrary::from_source("geometry.wgsl", GEOMETRY);
        let err = lib.function("vertex_main", ShaderStage::Fragment).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingEntryPoint {
                name: "vertex_main".into(),
                stage: ShaderStage::Fragment,
            }
        );
    }

    #[test]
    fn plain_functions_are_not_entry_points() {
        let lib = ShaderLibrary::from_source("geometry.wgsl", GEOMETRY);
        assert!(lib.function("helper", ShaderStage::Vertex).is_err());
        assert!(lib.function("commented_out", ShaderStage::Fragment).is_err());
    }

    #[test]
    fn block_commented_entry_points_are_missing() {
        let lib = ShaderLibrary::from_source("geometry.wgsl", GEOMETRY);
        assert_eq!(
            lib.function("ghost", ShaderStage::Vertex).unwrap_err(),
            PipelineError::MissingEntryPoint {
                name: "ghost".into(),
                stage: ShaderStage::Vertex,
            }
        );
        assert!(lib.function("still_commented", ShaderStage::Fragment).is_err());
    }

    #[test]
    fn entry_point_after_block_comment_is_found() {
        let lib = ShaderLibrary::from_source(
            "inline.wgsl",
            "/* a /* b */ c */ @vertex /* gap */ fn vs() {}",
        );
        assert!(lib.function("vs", ShaderStage::Vertex).is_ok());
    }

    #[test]
    fn load_missing_file_is_unreadable() {
        let path = std::env::temp_dir().join("prism-engine-no-such-library.wgsl");
        let err = ShaderLibrary::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::LibraryUnreadable { path: p, .. } if p == path));
    }

    #[test]
    fn load_reads_source_from_disk() {
        let path = std::env::temp_dir().join(format!("prism-engine-{}.wgsl", std::process::id()));
        std::fs::write(&path, GEOMETRY).unwrap();

        let lib = ShaderLibrary::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(lib.source(), GEOMETRY);
        assert!(lib.function("fragment_main", ShaderStage::Fragment).is_ok());
    }
}
