//! Shader compilation through an external `shaderc` binary.
//!
//! Shader resources carry two parameters: `type` (vertex, fragment or
//! compute, with short aliases) and `platform`. The platform `src` copies
//! the shader source verbatim; every other platform is compiled by invoking
//! the shader compiler as a child process.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::converter::{ConvertArgs, Converter};
use crate::copy::CopyConverter;
use crate::error::ConvertError;

/// Platform value that packages the shader source instead of bytecode.
const SOURCE_PLATFORM: &str = "src";

/// Include directory the default converter passes with `-i`.
///
/// Relative to the compiler's working directory.
pub const STANDARD_INCLUDE_DIR: &str = "bgfx";

/// Shader stages understood by the compiler, with their accepted aliases.
const STAGE_ALIASES: &[(&[&str], ShaderStage)] = &[
    (&["v", "vert", "vertex"], ShaderStage::Vertex),
    (&["f", "frag", "fragment"], ShaderStage::Fragment),
    (&["c", "comp", "compute"], ShaderStage::Compute),
];

/// A shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment (pixel) shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl ShaderStage {
    /// Resolves a stage name or alias.
    pub fn parse(name: &str) -> Option<Self> {
        STAGE_ALIASES
            .iter()
            .find(|(aliases, _)| aliases.contains(&name))
            .map(|(_, stage)| *stage)
    }

    /// The name the compiler expects for `--type`.
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }
}

/// The `-p` argument for one stage on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    /// The compiler's default profile; `-p` is omitted.
    Default,
    /// A named profile.
    Named(&'static str),
    /// The platform cannot compile this stage.
    Unsupported,
}

/// A platform name (or renderer alias) mapped to the compiler's `--platform`
/// value and a profile per stage.
struct PlatformProfile {
    names: &'static [&'static str],
    platform: &'static str,
    vertex: Profile,
    fragment: Profile,
    compute: Profile,
}

impl PlatformProfile {
    fn profile(&self, stage: ShaderStage) -> Profile {
        match stage {
            ShaderStage::Vertex => self.vertex,
            ShaderStage::Fragment => self.fragment,
            ShaderStage::Compute => self.compute,
        }
    }

    const fn uniform(names: &'static [&'static str], platform: &'static str, profile: Profile) -> Self {
        Self {
            names,
            platform,
            vertex: profile,
            fragment: profile,
            compute: profile,
        }
    }
}

/// Every platform a shader can be compiled for.
pub const SHADER_PLATFORMS: &[&str] = &["android", "asm.js", "ios", "linux", "nacl", "osx", "windows"];

const PROFILES: &[PlatformProfile] = &[
    PlatformProfile::uniform(&["android", "essl"], "android", Profile::Default),
    PlatformProfile::uniform(&["asm.js"], "asm.js", Profile::Default),
    PlatformProfile::uniform(&["ios"], "ios", Profile::Named("metal")),
    PlatformProfile {
        names: &["linux", "glsl"],
        platform: "linux",
        vertex: Profile::Named("120"),
        fragment: Profile::Named("120"),
        compute: Profile::Named("430"),
    },
    PlatformProfile::uniform(&["spirv"], "linux", Profile::Named("spirv")),
    PlatformProfile::uniform(&["nacl"], "nacl", Profile::Default),
    PlatformProfile::uniform(&["osx", "metal"], "osx", Profile::Named("metal")),
    PlatformProfile {
        names: &["windows", "dx11"],
        platform: "windows",
        vertex: Profile::Named("vs_4_0"),
        fragment: Profile::Named("ps_4_0"),
        compute: Profile::Named("cs_5_0"),
    },
    PlatformProfile {
        names: &["dx9"],
        platform: "windows",
        vertex: Profile::Named("vs_3_0"),
        fragment: Profile::Named("ps_3_0"),
        compute: Profile::Unsupported,
    },
    PlatformProfile::uniform(&["pssl"], "orbis", Profile::Named("pssl")),
];

/// Compiles shaders by running an external shader compiler.
#[derive(Debug, Clone)]
pub struct ShadercConverter {
    program: PathBuf,
    include_dir: Option<PathBuf>,
}

impl Default for ShadercConverter {
    /// `shaderc` from `PATH`, with [`STANDARD_INCLUDE_DIR`].
    fn default() -> Self {
        Self::new("shaderc").with_include_dir(STANDARD_INCLUDE_DIR)
    }
}

impl ShadercConverter {
    /// Creates a converter that invokes `program` without an include directory.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            include_dir: None,
        }
    }

    /// Adds an include directory passed to the compiler with `-i`.
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }

    /// Builds the compiler invocation for one shader.
    fn command(
        &self,
        source: &Path,
        output: &Path,
        platform: &str,
        stage: ShaderStage,
    ) -> Result<Command, ConvertError> {
        let entry = PROFILES
            .iter()
            .find(|p| p.names.contains(&platform))
            .ok_or_else(|| {
                ConvertError::invalid_parameter("platform", format!("unknown platform '{platform}'"))
            })?;
        let profile = entry.profile(stage);
        if profile == Profile::Unsupported {
            return Err(ConvertError::invalid_parameter(
                "platform",
                format!("no {} shader for platform '{platform}'", stage.as_str()),
            ));
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg("-f").arg(source).arg("-o").arg(output);
        if let Some(dir) = &self.include_dir {
            cmd.arg("-i").arg(dir);
        }
        cmd.arg("--platform").arg(entry.platform);
        if let Profile::Named(p) = profile {
            cmd.arg("-p").arg(p);
        }
        cmd.arg("--type").arg(stage.as_str());
        Ok(cmd)
    }
}

impl Converter for ShadercConverter {
    fn convert(&self, args: &ConvertArgs<'_>) -> Result<(), ConvertError> {
        let platform = args
            .str_param("platform")
            .ok_or_else(|| ConvertError::invalid_parameter("platform", "missing"))?;
        if platform == SOURCE_PLATFORM {
            return CopyConverter.convert(args);
        }

        let stage_name = args
            .str_param("type")
            .ok_or_else(|| ConvertError::invalid_parameter("type", "missing"))?;
        let stage = ShaderStage::parse(stage_name).ok_or_else(|| {
            ConvertError::invalid_parameter("type", format!("unknown shader type '{stage_name}'"))
        })?;

        let program = self.program.display().to_string();
        let mut cmd = self.command(args.source_file, args.output_file, platform, stage)?;
        log::debug!("running {cmd:?}");

        let status = cmd.status().map_err(|e| ConvertError::Tool {
            program: program.clone(),
            reason: e.to_string(),
        })?;
        if !status.success() {
            return Err(ConvertError::Tool {
                program,
                reason: status.to_string(),
            });
        }

        let written = std::fs::metadata(args.output_file).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(ConvertError::Tool {
                program,
                reason: format!("no output written to {}", args.output_file.display()),
            });
        }
        Ok(())
    }
}
