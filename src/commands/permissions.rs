use std::path::PathBuf;

use tauri::command;

use crate::permissions::{
    check_all, check_permission_detailed, Capability, CapabilityGrant, PermissionInfo,
    PermissionStatus,
};

/// Request microphone permission (platform-specific)
#[command]
pub async fn request_record_permission() -> Result<PermissionInfo, String> {
    log::info!("Requesting microphone permission");

    let current_status = check_permission_detailed();

    if current_status.status == PermissionStatus::Granted {
        log::info!("Permission already granted");
        return Ok(current_status);
    }

    if !current_status.can_request {
        log::warn!("Cannot request permission: {}", current_status.message);
        return Ok(current_status);
    }

    // Platform-specific permission request
    #[cfg(target_os = "macos")]
    {
        request_permission_macos().await
    }

    #[cfg(target_os = "windows")]
    {
        // Windows doesn't have programmatic permission request
        // User must enable in Settings > Privacy > Microphone
        Ok(PermissionInfo {
            status: PermissionStatus::NotDetermined,
            message: "Please enable microphone access in Windows Settings > Privacy > Microphone"
                .to_string(),
            can_request: false,
        })
    }

    #[cfg(target_os = "linux")]
    {
        // Linux permissions are group-based
        // User must add themselves to the audio group
        Ok(PermissionInfo {
            status: PermissionStatus::NotDetermined,
            message: "Run: sudo usermod -a -G audio $USER && newgrp audio".to_string(),
            can_request: false,
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        Err("Platform not supported".to_string())
    }
}

#[cfg(target_os = "macos")]
async fn request_permission_macos() -> Result<PermissionInfo, String> {
    use block::ConcreteBlock;
    use objc::runtime::{Class, Object};
    use objc::{msg_send, sel, sel_impl};
    use std::ffi::CString;
    use std::sync::mpsc;
    use std::time::Duration;

    log::info!("Requesting macOS microphone permission");

    unsafe {
        let av_capture_device_class =
            Class::get("AVCaptureDevice").ok_or("AVFoundation not available")?;

        let av_media_type_audio = CString::new("soun").unwrap();
        let media_type: *mut Object =
            msg_send![av_capture_device_class, mediaTypeForString: av_media_type_audio.as_ptr()];

        let (tx, rx) = mpsc::channel();

        // Heap-copied Objective-C completion block; the system dialog
        // resolves it asynchronously.
        let tx_clone = tx.clone();
        let handler = ConcreteBlock::new(move |granted: bool| {
            let _ = tx_clone.send(granted);
        });
        let handler = handler.copy();

        // Request access (this will show system dialog)
        let _: () = msg_send![av_capture_device_class, requestAccessForMediaType:media_type completionHandler:&*handler];
        match rx.recv_timeout(Duration::from_secs(60)) {
            Ok(granted) if granted => {
                log::info!("Microphone permission granted");
                Ok(PermissionInfo {
                    status: PermissionStatus::Granted,
                    message: "Microphone access authorized".to_string(),
                    can_request: false,
                })
            }
            Ok(_) => {
                log::warn!("Microphone permission denied");
                Ok(PermissionInfo {
                    status: PermissionStatus::Denied,
                    message: "Microphone access denied by user".to_string(),
                    can_request: false,
                })
            }
            Err(_) => {
                log::error!("Permission request timed out");
                Err("Permission request timed out".to_string())
            }
        }
    }
}

/// Request all three capabilities the recorder needs and apply the outcome
/// to a screen (if given), unblocking recording when record-audio is
/// granted.
///
/// Returns the per-capability map; any denial is the caller's cue for a
/// single user-facing alert.
#[command]
pub async fn request_all_permissions(
    screen_id: Option<String>,
) -> Result<Vec<CapabilityGrant>, String> {
    let record_info = request_record_permission().await?;

    let storage_dir = PathBuf::from(super::config::current().await.storage.output_directory);
    let mut grants = check_all(&storage_dir);
    for grant in grants.iter_mut() {
        if grant.capability == Capability::RecordAudio {
            grant.info = record_info.clone();
        }
    }

    let denied: Vec<String> = grants
        .iter()
        .filter(|g| g.info.status != PermissionStatus::Granted)
        .map(|g| g.capability.to_string())
        .collect();
    if !denied.is_empty() {
        log::warn!("Permissions not granted: {}", denied.join(", "));
    }

    if let Some(screen_id) = screen_id {
        let screen = super::get_screen(&screen_id).await?;
        screen.apply_grants(&grants);
    }

    Ok(grants)
}

/// Check microphone permission status
#[command]
pub async fn check_record_permission_status() -> Result<PermissionInfo, String> {
    log::debug!("Checking microphone permission status");
    Ok(check_permission_detailed())
}

/// Get human-readable permission status string (legacy compatibility)
#[command]
pub fn get_permission_status_string() -> String {
    let info = check_permission_detailed();
    format!("{:?}", info.status)
}
