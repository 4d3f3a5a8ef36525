//! Shader templates and compiled programs.
//!
//! A [`ShaderSource`] is GLSL text carrying `$identifier(defaultLiteral)$`
//! placeholder tokens. Building a program resolves every token against
//! caller overrides (falling back to the declared default, then to the
//! literal embedded in the token) and strips any remaining bare `$`.
//! There is no escaping: substituted values must not contain `$`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::RenderError;
use crate::gpu::{GpuContext, ProgramId};

/// Embedded GLSL templates for the built-in pipelines.
pub const MESH3D_VERT: &str = include_str!("shaders/mesh3d.vert");
pub const MESH3D_FRAG: &str = include_str!("shaders/mesh3d.frag");
pub const MESH2D_VERT: &str = include_str!("shaders/mesh2d.vert");
pub const MESH2D_FRAG: &str = include_str!("shaders/mesh2d.frag");

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\(([^)$]*)\)\$").expect("placeholder regex")
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A named shader template plus its declared parameter defaults.
#[derive(Clone, Debug)]
pub struct ShaderSource {
    pub name: String,
    pub stage: ShaderStage,
    source: String,
    defaults: HashMap<String, String>,
}

impl ShaderSource {
    pub fn new(
        name: impl Into<String>,
        stage: ShaderStage,
        source: impl Into<String>,
        defaults: &[(&str, &str)],
    ) -> Self {
        Self {
            name: name.into(),
            stage,
            source: source.into(),
            defaults: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Resolve all placeholder tokens. Priority per token: caller
    /// override, declared default, literal embedded in the token.
    pub fn with_params(&self, overrides: &[(&str, &str)]) -> String {
        let resolved = token_re().replace_all(&self.source, |caps: &regex::Captures| {
            let key = &caps[1];
            overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .or_else(|| self.defaults.get(key).cloned())
                .unwrap_or_else(|| caps[2].to_string())
        });
        resolved.replace('$', "")
    }
}

/// Registry of shader templates, owned by the renderer (not process
/// state); registration must precede use.
#[derive(Debug, Default)]
pub struct ShaderRegistry {
    sources: HashMap<String, ShaderSource>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in 3D/2D mesh templates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ShaderSource::new(
            "mesh3d.vert",
            ShaderStage::Vertex,
            MESH3D_VERT,
            &[],
        ));
        registry.register(ShaderSource::new(
            "mesh3d.frag",
            ShaderStage::Fragment,
            MESH3D_FRAG,
            &[],
        ));
        registry.register(ShaderSource::new(
            "mesh2d.vert",
            ShaderStage::Vertex,
            MESH2D_VERT,
            &[],
        ));
        registry.register(ShaderSource::new(
            "mesh2d.frag",
            ShaderStage::Fragment,
            MESH2D_FRAG,
            &[],
        ));
        registry
    }

    pub fn register(&mut self, source: ShaderSource) {
        if self.sources.insert(source.name.clone(), source.clone()).is_some() {
            log::warn!("Shader template '{}' re-registered", source.name);
        }
    }

    pub fn get(&self, name: &str) -> Result<&ShaderSource, RenderError> {
        self.sources
            .get(name)
            .ok_or_else(|| RenderError::UnknownShader(name.to_owned()))
    }

    /// Resolve a template by name into final GLSL text.
    pub fn source_with_params(
        &self,
        name: &str,
        overrides: &[(&str, &str)],
    ) -> Result<String, RenderError> {
        Ok(self.get(name)?.with_params(overrides))
    }
}

/// Pre-formatted uniform names for one point-light array slot, built at
/// link time instead of re-concatenated every draw call.
#[derive(Clone, Debug)]
pub struct PointLightNames {
    pub position: String,
    pub ambient: String,
    pub diffuse: String,
    pub specular: String,
    pub constant: String,
    pub linear: String,
    pub quadratic: String,
}

impl PointLightNames {
    fn new(index: usize) -> Self {
        let field = |f: &str| format!("pointLights[{index}].{f}");
        Self {
            position: field("position"),
            ambient: field("ambient"),
            diffuse: field("diffuse"),
            specular: field("specular"),
            constant: field("constant"),
            linear: field("linear"),
            quadratic: field("quadratic"),
        }
    }
}

/// A compiled-and-linked program built from two resolved templates.
#[derive(Debug)]
pub struct Shader {
    pub program: ProgramId,
    pub name: String,
    pub max_lights: usize,
    point_lights: Vec<PointLightNames>,
}

impl Shader {
    /// Resolve both templates with the same overrides, then compile and
    /// link. `max_lights` must match the fragment template's `maxLights`
    /// parameter (it sizes both the GLSL array and the uniform-name
    /// table).
    pub fn link(
        device: &mut dyn GpuContext,
        registry: &ShaderRegistry,
        name: &str,
        vertex_template: &str,
        fragment_template: &str,
        overrides: &[(&str, &str)],
        max_lights: usize,
    ) -> Result<Shader, RenderError> {
        let vertex_src = registry.source_with_params(vertex_template, overrides)?;
        let fragment_src = registry.source_with_params(fragment_template, overrides)?;
        let program = device.create_program(name, &vertex_src, &fragment_src)?;
        Ok(Shader {
            program,
            name: name.to_owned(),
            max_lights,
            point_lights: (0..max_lights).map(PointLightNames::new).collect(),
        })
    }

    pub fn point_light_names(&self, index: usize) -> &PointLightNames {
        &self.point_lights[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn precision_template() -> ShaderSource {
        ShaderSource::new(
            "test.frag",
            ShaderStage::Fragment,
            "precision $fPrecision(highp)$ float;",
            &[],
        )
    }

    #[test]
    fn default_literal_is_substituted() {
        let src = precision_template();
        assert_eq!(src.with_params(&[]), "precision highp float;");
    }

    #[test]
    fn override_wins_over_default() {
        let src = precision_template();
        assert_eq!(
            src.with_params(&[("fPrecision", "lowp")]),
            "precision lowp float;"
        );
    }

    #[test]
    fn declared_default_wins_over_embedded_literal() {
        let src = ShaderSource::new(
            "test",
            ShaderStage::Vertex,
            "#define MAX_LIGHTS $maxLights(8)$",
            &[("maxLights", "4")],
        );
        assert_eq!(src.with_params(&[]), "#define MAX_LIGHTS 4");
    }

    #[test]
    fn leftover_dollars_are_stripped() {
        let src = ShaderSource::new("test", ShaderStage::Vertex, "a $ b $x(1)$", &[]);
        assert_eq!(src.with_params(&[]), "a  b 1");
    }

    #[test]
    fn multiple_tokens_resolve_independently() {
        let src = ShaderSource::new(
            "test",
            ShaderStage::Fragment,
            "#define A $a(0)$\n#define B $b(2)$\n",
            &[],
        );
        assert_eq!(src.with_params(&[("a", "1")]), "#define A 1\n#define B 2\n");
    }

    #[test]
    fn unknown_template_is_a_typed_error() {
        let registry = ShaderRegistry::new();
        match registry.source_with_params("nope", &[]) {
            Err(RenderError::UnknownShader(name)) => assert_eq!(name, "nope"),
            other => panic!("expected UnknownShader, got {other:?}"),
        }
    }

    #[test]
    fn builtin_templates_resolve_to_plain_glsl() {
        let registry = ShaderRegistry::with_builtins();
        let frag = registry
            .source_with_params("mesh3d.frag", &[("maxLights", "4"), ("normalMap", "1")])
            .expect("resolve");
        assert!(!frag.contains('$'));
        assert!(frag.contains("#define MAX_LIGHTS 4"));
        assert!(frag.contains("#define NORMAL_MAP 1"));
    }
}
