use std::path::PathBuf;

/// Renderer setup parameters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// WGSL library holding both shader stages. A relative path resolves
    /// against the process working directory.
    pub shader_path: PathBuf,

    pub vertex_entry: String,
    pub fragment_entry: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shader_path: PathBuf::from("./shaders/geometry.wgsl"),
            vertex_entry: "vertex_main".to_string(),
            fragment_entry: "fragment_main".to_string(),
        }
    }
}
