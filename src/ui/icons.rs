//! Shared UI icons.
//!
//! Each icon falls back to plain ASCII on terminals without emoji support.

use console::Emoji;

// Outcome indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Campaign status
pub static ACTIVE: Emoji<'_, '_> = Emoji("🟢", "+");
pub static PAUSED: Emoji<'_, '_> = Emoji("⏸️ ", "=");
pub static ARCHIVED: Emoji<'_, '_> = Emoji("📦", "x");
pub static DRAFT: Emoji<'_, '_> = Emoji("📝", "~");

// Headers
pub static ACCOUNT: Emoji<'_, '_> = Emoji("🏢 ", "");
pub static BELL: Emoji<'_, '_> = Emoji("🔔 ", "[!]");
pub static COPY: Emoji<'_, '_> = Emoji("📄 ", "+");
