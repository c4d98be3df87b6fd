//! Scripted text revealed by the sequences

/// Boot log, revealed one line at a time
pub const BOOT_LINES: [&str; 10] = [
    "BIOS_DATE: 06/19/2007 00:00:00",
    "CPU: SHINZO_NEURAL_CHIP @ 9.19 THz",
    "MEMORY: 8192 PB OK",
    "LOADING KERNEL...",
    "MOUNTING /dev/encrypted...",
    "DECRYPTING_VOLUMES...",
    "LOADING SECURITY_PROTOCOLS...",
    "ESTABLISHING NEURAL_UPLINK...",
    "CHECKING BIOMETRICS...",
    "SYSTEM READY.",
];

pub const BOOT_CONTINUE_PROMPT: &str = "PRESS ANY KEY TO CONTINUE...";

/// Typed out character by character on the intro screen
pub const INTRO_MESSAGE: &str = "WELCOME TO THE MAINFRAME, SHINZO.\n\n\
SECURITY PROTOCOL: MAXIMUM\n\
4 FIREWALLS DETECTED.\n\
COMPLETE BIOMETRIC VERIFICATION TO PROCEED.";

pub const ACCESS_GRANTED: &str = "ACCESS_GRANTED";
pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
pub const DENIED_ICON: &str = "❌";

pub const BREACH_SUCCESSFUL: &str = "BREACH_SUCCESSFUL";
pub const BREACH_FAILED: &str = "BREACH_FAILED";

/// Rotated on the celebration screen
pub const BLESSINGS: [&str; 8] = [
    "May your code always compile... 🚀",
    "Wishing you infinite RAM and zero bugs... 💻",
    "May your algorithms always be optimal... ⚡",
    "Sending you terabytes of love... 💾❤️",
    "May your birthday be as epic as Ayan's love for you... 🎮",
    "Wishing you 100% uptime in happiness... 🌟",
    "May your frame rate never drop... 🎯",
    "Blessings from the Mainframe... 🕉️",
];

/// Falling icons on the celebration screen
pub const CELEBRATION_EMOJIS: [&str; 15] = [
    "🎂", "🎁", "🎈", "🎉", "✨", "🌟", "💝", "🎊", "🕉️", "☮️", "💖", "🎮", "👾", "💻", "⚡",
];

pub const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// `0x` followed by `digits` random uppercase hex digits
pub fn random_hex<R: rand::Rng + ?Sized>(rng: &mut R, digits: usize) -> String {
    let mut out = String::with_capacity(digits + 2);
    out.push_str("0x");
    for _ in 0..digits {
        out.push(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_hex_has_prefix_and_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let hex = random_hex(&mut rng, 32);
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 34);
        assert!(hex[2..].bytes().all(|b| HEX_DIGITS.contains(&b)));
    }

    #[test]
    fn boot_script_ends_ready() {
        assert_eq!(BOOT_LINES.last(), Some(&"SYSTEM READY."));
    }
}
