/// Graphics API reported by the host when its device initializes.
///
/// Raw ids follow Unity's `UnityGfxRenderer` enumeration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GraphicsApi {
    Direct3D11,
    /// No device, or a device that renders nothing.
    Null,
    OpenGLES20,
    OpenGLES30,
    PlayStation4,
    XboxOne,
    Metal,
    OpenGLCore,
    Direct3D12,
    Vulkan,
    Nvn,
    XboxOneD3D12,
    /// Any id this crate does not know about.
    Unknown(i32),
}

impl GraphicsApi {
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            2 => Self::Direct3D11,
            4 => Self::Null,
            8 => Self::OpenGLES20,
            11 => Self::OpenGLES30,
            13 => Self::PlayStation4,
            14 => Self::XboxOne,
            16 => Self::Metal,
            17 => Self::OpenGLCore,
            18 => Self::Direct3D12,
            21 => Self::Vulkan,
            22 => Self::Nvn,
            23 => Self::XboxOneD3D12,
            other => Self::Unknown(other),
        }
    }

    pub const fn to_raw(self) -> i32 {
        match self {
            Self::Direct3D11 => 2,
            Self::Null => 4,
            Self::OpenGLES20 => 8,
            Self::OpenGLES30 => 11,
            Self::PlayStation4 => 13,
            Self::XboxOne => 14,
            Self::Metal => 16,
            Self::OpenGLCore => 17,
            Self::Direct3D12 => 18,
            Self::Vulkan => 21,
            Self::Nvn => 22,
            Self::XboxOneD3D12 => 23,
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns `true` for the OpenGL core and OpenGL ES family.
    pub const fn is_opengl(self) -> bool {
        matches!(self, Self::OpenGLCore | Self::OpenGLES20 | Self::OpenGLES30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_ids_round_trip_for_known_apis() {
        for raw in [2, 4, 8, 11, 13, 14, 16, 17, 18, 21, 22, 23] {
            let api = GraphicsApi::from_raw(raw);
            assert!(!matches!(api, GraphicsApi::Unknown(_)), "id {raw} should be known");
            assert_eq!(api.to_raw(), raw);
        }
    }

    #[test]
    fn unknown_id_is_preserved() {
        assert_eq!(GraphicsApi::from_raw(99), GraphicsApi::Unknown(99));
        assert_eq!(GraphicsApi::Unknown(99).to_raw(), 99);
    }

    #[test]
    fn opengl_family() {
        assert!(GraphicsApi::OpenGLCore.is_opengl());
        assert!(GraphicsApi::OpenGLES30.is_opengl());
        assert!(!GraphicsApi::Vulkan.is_opengl());
        assert!(!GraphicsApi::Null.is_opengl());
    }
}
