pub const BOARD_SIZE: u8 = 100;
pub const BOARD_WIDTH: u8 = 10;
pub const DIE_FACES: u8 = 6;

pub const ROLL_TICK_MS: u64 = 100;
pub const ROLL_DURATION_MS: u64 = 1000;
pub const FEATURE_DELAY_MS: u64 = 1000;
pub const ADVANCE_DELAY_MS: u64 = 1500;
pub const MESSAGE_MS: u64 = 3000;
pub const WIN_MESSAGE_MS: u64 = 5000;
pub const FEATURE_MESSAGE_MS: u64 = 2000;

#[inline] pub fn is_winning_position(position: u8) -> bool { position == BOARD_SIZE }

#[inline] pub fn remaining_to_win(position: u8) -> u8 { BOARD_SIZE.saturating_sub(position) }

/// Cell reached by moving `steps` from `position`, or `None` on overshoot.
pub fn landing_cell(position: u8, steps: u8) -> Option<u8> {
    let target = position as u16 + steps as u16;
    if target > BOARD_SIZE as u16 { None } else { Some(target as u8) }
}

pub fn progress_percent(position: u8) -> u8 {
    ((position.min(BOARD_SIZE) as u32 * 100) / BOARD_SIZE as u32) as u8
}
