use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{Device, DeviceId, DeviceType, File, FileId, FileMetadata, FileType};
use crate::world::{WorldDbError, WorldStore};

pub const FILE_CIPHER: &str = "AES-256";
const MAX_FILE_SECURITY: u8 = 5;

fn file_count(device_type: DeviceType, rng: &mut WorldRng) -> usize {
    match device_type {
        DeviceType::Server => rng.range(5..=10),
        DeviceType::DesktopPc | DeviceType::Laptop => rng.range(3..=7),
        _ => rng.range(1..=4),
    }
}

fn name_parts(file_type: FileType) -> (&'static [&'static str], &'static [&'static str]) {
    match file_type {
        FileType::Text => (&["note", "memo", "document", "report"], &[".txt"]),
        FileType::Document => (&["contract", "memo", "brief", "report"], &[".pdf", ".docx"]),
        FileType::Spreadsheet => (
            &["data", "budget", "inventory", "analysis", "report"],
            &[".xlsx"],
        ),
        FileType::Database => (
            &["data", "records", "system", "users", "transactions"],
            &[".db"],
        ),
        FileType::Image => (
            &["image", "photo", "picture", "scan", "screenshot"],
            &[".jpg", ".png", ".gif"],
        ),
        FileType::Audio => (
            &["recording", "audio", "voice", "sound", "music"],
            &[".mp3", ".wav", ".ogg"],
        ),
        FileType::Video => (
            &["video", "recording", "footage", "movie", "clip"],
            &[".mp4", ".avi", ".mkv"],
        ),
        FileType::Archive => (
            &["archive", "backup", "package", "data", "files"],
            &[".zip", ".rar", ".tar.gz"],
        ),
        FileType::Executable => (
            &["program", "installer", "setup", "tool", "utility"],
            &[".exe", ".bin"],
        ),
        FileType::Script => (
            &["script", "automation", "tool", "utility", "helper"],
            &[".py", ".js", ".sh", ".bat"],
        ),
        FileType::Log => (&["system", "access", "error", "audit"], &[".log"]),
        FileType::Config => (
            &["config", "settings", "preferences", "options", "setup"],
            &[".ini", ".cfg", ".conf", ".json", ".xml"],
        ),
    }
}

pub fn file_name(file_type: FileType, rng: &mut WorldRng) -> String {
    let (prefixes, extensions) = name_parts(file_type);
    let prefix = rng.pick(prefixes);
    let number: u32 = rng.range(1..=999);
    let extension = rng.pick(extensions);
    format!("{}_{}{}", prefix, number, extension)
}

pub fn file_size_kb(file_type: FileType, rng: &mut WorldRng) -> u32 {
    match file_type {
        FileType::Video | FileType::Archive | FileType::Database => rng.range(1_000..=10_000),
        FileType::Audio | FileType::Image | FileType::Executable => rng.range(100..=2_000),
        _ => rng.range(1..=500),
    }
}

fn file_content(file_type: FileType, rng: &mut WorldRng) -> String {
    match file_type {
        FileType::Text | FileType::Document => rng
            .pick(&[
                "Meeting moved to the 14th floor. Bring the access badge.",
                "Quarterly numbers look bad. Shred the originals.",
                "Reminder: rotate the server credentials before the audit.",
                "The shipment arrives at dock 7 after midnight.",
            ])
            .to_string(),
        FileType::Log => format!(
            "[{:02}:{:02}:{:02}] login failed for user admin",
            rng.range(0..24u32),
            rng.range(0..60u32),
            rng.range(0..60u32)
        ),
        FileType::Config => format!("port={}\nssl=true", rng.range(1024..=65535u32)),
        FileType::Script => "#!/bin/sh\necho sync complete".to_string(),
        _ => "[binary data]".to_string(),
    }
}

/// Files never outrank the device holding them.
pub fn build_file(device: &Device, rng: &mut WorldRng) -> File {
    let file_type = *rng.pick(FileType::ALL);
    let name = file_name(file_type, rng);
    let size_kb = file_size_kb(file_type, rng);
    let drop: u8 = rng.range(0..=2);
    let security_level = device.security_level.saturating_sub(drop).min(MAX_FILE_SECURITY);
    let is_encrypted = security_level >= 2;
    let content = file_content(file_type, rng);

    File {
        id: FileId(rng.next_uuid()),
        world_id: device.world_id,
        device_id: device.id,
        name,
        file_type,
        size_kb,
        security_level,
        is_encrypted,
        encryption_type: is_encrypted.then(|| FILE_CIPHER.to_string()),
        content,
        metadata: FileMetadata {
            permissions: if security_level < 3 {
                "rw-r--r--".to_string()
            } else {
                "rw-------".to_string()
            },
            is_hidden: security_level >= 4,
            is_system: rng.chance(0.2),
            is_readonly: rng.chance(0.3),
        },
    }
}

pub fn generate_files(
    store: &dyn WorldStore,
    device_ids: &[DeviceId],
    rng: &mut WorldRng,
) -> Result<Vec<FileId>, WorldDbError> {
    let mut ids = Vec::new();
    for device_id in device_ids {
        let Some(device) = store.device(*device_id)? else {
            warn!(device_id = %device_id, "device not found, skipping its files");
            continue;
        };
        let count = file_count(device.device_type, rng);
        for _ in 0..count {
            let file = build_file(&device, rng);
            store.insert_file(&file)?;
            ids.push(file.id);
        }
        debug!(device = %device.name, files = count, "generated files");
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LocationId, WorldId};
    use uuid::Uuid;

    fn device(security_level: u8) -> Device {
        Device {
            id: DeviceId(Uuid::from_u128(7)),
            world_id: WorldId(Uuid::from_u128(1)),
            location_id: LocationId(Uuid::from_u128(2)),
            building_id: None,
            room_id: None,
            owner_id: None,
            name: "SRV-DB-007".to_string(),
            description: String::new(),
            device_type: DeviceType::Server,
            os_type: "Linux Debian".to_string(),
            security_level,
            ip_address: "10.0.0.7".to_string(),
            is_connected: true,
        }
    }

    #[test]
    fn encryption_follows_security() {
        let mut rng = WorldRng::new(Some(19));
        for level in 1..=5 {
            let host = device(level);
            for _ in 0..30 {
                let file = build_file(&host, &mut rng);
                assert!(file.security_level <= level);
                assert!(level - file.security_level <= 2);
                assert_eq!(file.is_encrypted, file.security_level >= 2);
                assert_eq!(file.encryption_type.is_some(), file.is_encrypted);
            }
        }
    }

    #[test]
    fn names_carry_type_extensions() {
        let mut rng = WorldRng::new(Some(1));
        assert!(file_name(FileType::Database, &mut rng).ends_with(".db"));
        assert!(file_name(FileType::Log, &mut rng).ends_with(".log"));
        let big = file_size_kb(FileType::Video, &mut rng);
        assert!((1_000..=10_000).contains(&big));
    }

    #[test]
    fn every_file_type_has_name_parts() {
        for file_type in FileType::ALL {
            let (prefixes, extensions) = name_parts(*file_type);
            assert!(!prefixes.is_empty() && !extensions.is_empty());
        }
    }
}
