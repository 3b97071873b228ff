/// Device lifecycle notification from the host.
///
/// Raw ids follow Unity's `UnityGfxDeviceEventType`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeviceEvent {
    Initialize,
    Shutdown,
    BeforeReset,
    AfterReset,
    Unknown(i32),
}

impl DeviceEvent {
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Initialize,
            1 => Self::Shutdown,
            2 => Self::BeforeReset,
            3 => Self::AfterReset,
            other => Self::Unknown(other),
        }
    }

    pub const fn to_raw(self) -> i32 {
        match self {
            Self::Initialize => 0,
            Self::Shutdown => 1,
            Self::BeforeReset => 2,
            Self::AfterReset => 3,
            Self::Unknown(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_lifecycle_ids() {
        assert_eq!(DeviceEvent::from_raw(0), DeviceEvent::Initialize);
        assert_eq!(DeviceEvent::from_raw(1), DeviceEvent::Shutdown);
        assert_eq!(DeviceEvent::from_raw(2), DeviceEvent::BeforeReset);
        assert_eq!(DeviceEvent::from_raw(3), DeviceEvent::AfterReset);
        assert_eq!(DeviceEvent::from_raw(7), DeviceEvent::Unknown(7));
        assert_eq!(DeviceEvent::Unknown(7).to_raw(), 7);
    }
}
