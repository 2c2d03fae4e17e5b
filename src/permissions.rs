use std::path::Path;

/// The capabilities the recorder screen needs, as the original platform
/// request named them: microphone plus storage read/write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    RecordAudio,
    ReadStorage,
    WriteStorage,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::RecordAudio => write!(f, "record_audio"),
            Capability::ReadStorage => write!(f, "read_storage"),
            Capability::WriteStorage => write!(f, "write_storage"),
        }
    }
}

/// Permission status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PermissionStatus {
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
    /// Permission not determined (user hasn't been asked yet)
    NotDetermined,
    /// Permission restricted (parental controls, etc)
    Restricted,
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not_determined"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

/// Detailed permission information
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PermissionInfo {
    pub status: PermissionStatus,
    pub message: String,
    pub can_request: bool,
}

/// Per-capability outcome of a permission sweep
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CapabilityGrant {
    pub capability: Capability,
    pub info: PermissionInfo,
}

/// Check microphone permission status
/// Returns permission status for the current platform
pub fn check_permission() -> PermissionStatus {
    check_permission_detailed().status
}

/// Check microphone permission status with detailed information
pub fn check_permission_detailed() -> PermissionInfo {
    #[cfg(target_os = "windows")]
    {
        check_permission_windows()
    }

    #[cfg(target_os = "macos")]
    {
        check_permission_macos()
    }

    #[cfg(target_os = "linux")]
    {
        check_permission_linux()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        PermissionInfo {
            status: PermissionStatus::NotDetermined,
            message: "Platform not supported".to_string(),
            can_request: false,
        }
    }
}

/// Check a storage capability against the configured recordings directory.
///
/// Desktop platforms have no runtime storage grant; readability and
/// writability of the output directory are the operative facts.
pub fn check_storage(directory: &Path, capability: Capability) -> PermissionInfo {
    match capability {
        Capability::ReadStorage => match std::fs::read_dir(directory) {
            Ok(_) => PermissionInfo {
                status: PermissionStatus::Granted,
                message: format!("Recordings directory {:?} is readable", directory),
                can_request: false,
            },
            Err(_) if !directory.exists() => PermissionInfo {
                status: PermissionStatus::NotDetermined,
                message: format!(
                    "Recordings directory {:?} does not exist yet - it is created on first recording",
                    directory
                ),
                can_request: true,
            },
            Err(e) => PermissionInfo {
                status: PermissionStatus::Denied,
                message: format!("Cannot read recordings directory {:?}: {}", directory, e),
                can_request: false,
            },
        },
        Capability::WriteStorage => match std::fs::create_dir_all(directory) {
            Ok(()) => match std::fs::metadata(directory) {
                Ok(meta) if meta.permissions().readonly() => PermissionInfo {
                    status: PermissionStatus::Denied,
                    message: format!("Recordings directory {:?} is read-only", directory),
                    can_request: false,
                },
                Ok(_) => PermissionInfo {
                    status: PermissionStatus::Granted,
                    message: format!("Recordings directory {:?} is writable", directory),
                    can_request: false,
                },
                Err(e) => PermissionInfo {
                    status: PermissionStatus::Denied,
                    message: format!("Cannot stat recordings directory {:?}: {}", directory, e),
                    can_request: false,
                },
            },
            Err(e) => PermissionInfo {
                status: PermissionStatus::Denied,
                message: format!("Cannot create recordings directory {:?}: {}", directory, e),
                can_request: false,
            },
        },
        Capability::RecordAudio => check_permission_detailed(),
    }
}

/// Check all three capabilities the screen needs.
///
/// Returns one entry per capability, record-audio first, matching the
/// per-capability map the original platform request produced.
pub fn check_all(storage_directory: &Path) -> Vec<CapabilityGrant> {
    [
        Capability::RecordAudio,
        Capability::ReadStorage,
        Capability::WriteStorage,
    ]
    .into_iter()
    .map(|capability| CapabilityGrant {
        capability,
        info: check_storage(storage_directory, capability),
    })
    .collect()
}

#[cfg(target_os = "windows")]
fn check_permission_windows() -> PermissionInfo {
    // On Windows 10+, microphone access is controlled by Privacy settings.
    // Check if we can enumerate input devices as a proxy for permission.
    use cpal::traits::HostTrait;

    let host = cpal::default_host();
    match host.input_devices() {
        Ok(mut devices) if devices.next().is_some() => PermissionInfo {
            status: PermissionStatus::Granted,
            message: "Microphone access granted via Windows Privacy settings".to_string(),
            can_request: false,
        },
        Ok(_) => PermissionInfo {
            status: PermissionStatus::NotDetermined,
            message: "No microphones found - permission may not be granted".to_string(),
            can_request: true,
        },
        Err(e) => PermissionInfo {
            status: PermissionStatus::Denied,
            message: format!("Microphone access denied: {}", e),
            can_request: true,
        },
    }
}

#[cfg(target_os = "macos")]
fn check_permission_macos() -> PermissionInfo {
    use objc::runtime::{Class, Object};
    use objc::{msg_send, sel, sel_impl};
    use std::ffi::CString;

    unsafe {
        // Get AVCaptureDevice class
        let av_capture_device_class = Class::get("AVCaptureDevice");

        if av_capture_device_class.is_none() {
            return PermissionInfo {
                status: PermissionStatus::NotDetermined,
                message: "AVFoundation not available".to_string(),
                can_request: false,
            };
        }

        let av_capture_device_class = av_capture_device_class.unwrap();

        // Get media type for audio
        let av_media_type_audio = CString::new("soun").unwrap();
        let media_type: *mut Object =
            msg_send![av_capture_device_class, mediaTypeForString: av_media_type_audio.as_ptr()];

        // Check authorization status
        let auth_status: i64 =
            msg_send![av_capture_device_class, authorizationStatusForMediaType: media_type];

        // AVAuthorizationStatus enum values:
        // 0 = NotDetermined
        // 1 = Restricted
        // 2 = Denied
        // 3 = Authorized

        match auth_status {
            3 => PermissionInfo {
                status: PermissionStatus::Granted,
                message: "Microphone access authorized".to_string(),
                can_request: false,
            },
            2 => PermissionInfo {
                status: PermissionStatus::Denied,
                message: "Microphone access denied - enable in System Preferences > Security & Privacy > Microphone".to_string(),
                can_request: false,
            },
            1 => PermissionInfo {
                status: PermissionStatus::Restricted,
                message: "Microphone access restricted by system policy".to_string(),
                can_request: false,
            },
            _ => PermissionInfo {
                status: PermissionStatus::NotDetermined,
                message: "Microphone permission not yet requested".to_string(),
                can_request: true,
            },
        }
    }
}

#[cfg(target_os = "linux")]
fn check_permission_linux() -> PermissionInfo {
    use std::fs;

    // Check if any sound devices exist
    let snd_dir = Path::new("/dev/snd");
    let has_devices = fs::read_dir(snd_dir)
        .map(|entries| entries.flatten().next().is_some())
        .unwrap_or(false);

    if !has_devices {
        return PermissionInfo {
            status: PermissionStatus::NotDetermined,
            message: "No sound devices found at /dev/snd".to_string(),
            can_request: false,
        };
    }

    // Access is group-based on most distributions
    if check_linux_group_membership() {
        PermissionInfo {
            status: PermissionStatus::Granted,
            message: "Microphone access granted (user in audio group, /dev/snd present)"
                .to_string(),
            can_request: false,
        }
    } else {
        PermissionInfo {
            status: PermissionStatus::Denied,
            message: "Sound devices exist but user not in audio group - run: sudo usermod -a -G audio $USER".to_string(),
            can_request: true,
        }
    }
}

#[cfg(target_os = "linux")]
fn check_linux_group_membership() -> bool {
    use std::process::Command;

    // Check if user is in 'audio' group; pipewire/pulse sessions also work
    let output = Command::new("groups").output().ok();

    if let Some(output) = output {
        if let Ok(groups) = String::from_utf8(output.stdout) {
            return groups.contains("audio") || groups.contains("pipewire");
        }
    }

    // Fallback: assume permission if we can't check groups
    false
}
