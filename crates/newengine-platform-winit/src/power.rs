use std::fs;
use std::path::Path;

use newengine_os::os::PowerState;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct PowerInfo {
    pub state: PowerState,
    pub seconds_left: i32,
    pub percent_left: i32,
}

impl Default for PowerInfo {
    fn default() -> Self {
        Self {
            state: PowerState::Unknown,
            seconds_left: -1,
            percent_left: -1,
        }
    }
}

pub(crate) const SYSFS_POWER_SUPPLY: &str = "/sys/class/power_supply";

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_number(path: &Path) -> Option<i64> {
    read_trimmed(path)?.parse().ok()
}

/// Reads a sysfs-style `power_supply` directory. The first battery wins; with
/// no battery but a mains supply the machine reports `NoBattery`.
pub(crate) fn read_power_supply(root: &Path) -> PowerInfo {
    let Ok(entries) = fs::read_dir(root) else {
        return PowerInfo::default();
    };

    let mut saw_mains = false;
    let mut supplies: Vec<_> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
    supplies.sort();

    for dir in supplies {
        let kind = read_trimmed(&dir.join("type")).unwrap_or_default();
        if kind.eq_ignore_ascii_case("mains") {
            saw_mains = true;
            continue;
        }
        if !kind.eq_ignore_ascii_case("battery") {
            continue;
        }

        let status = read_trimmed(&dir.join("status")).unwrap_or_default();
        let state = match status.as_str() {
            "Charging" => PowerState::Charging,
            "Discharging" => PowerState::OnBattery,
            "Full" | "Not charging" => PowerState::Charged,
            _ => PowerState::Unknown,
        };

        let percent_left = read_number(&dir.join("capacity"))
            .map(|p| p.clamp(0, 100) as i32)
            .unwrap_or(-1);

        let seconds_left = if state == PowerState::OnBattery {
            match (
                read_number(&dir.join("energy_now")),
                read_number(&dir.join("power_now")),
            ) {
                (Some(energy), Some(power)) if power > 0 => (energy * 3600 / power) as i32,
                _ => -1,
            }
        } else {
            -1
        };

        return PowerInfo {
            state,
            seconds_left,
            percent_left,
        };
    }

    if saw_mains {
        PowerInfo {
            state: PowerState::NoBattery,
            ..PowerInfo::default()
        }
    } else {
        PowerInfo::default()
    }
}
