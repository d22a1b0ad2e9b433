//! Operator-facing text for the check-in screen.

pub const LOOKUP_NOT_FOUND: &str = "Tiket tidak ditemukan";
pub const LOOKUP_FAILED: &str = "Gagal memvalidasi tiket";
pub const USE_FAILED: &str = "Gagal menggunakan tiket";
pub const USE_SUCCEEDED: &str = "Tiket berhasil digunakan!";

pub const USE_ACTION: &str = "Gunakan Tiket";
pub const ALREADY_USED: &str = "Tiket sudah digunakan";
pub const NOT_VALID: &str = "Tiket tidak valid";
pub const RESET_ACTION: &str = "Scan Lagi";
