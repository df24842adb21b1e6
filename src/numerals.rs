//! Chinese numerals for generation labels (第十二世).

const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Place units inside one four-digit section, thousands first.
const UNITS: [&str; 4] = ["千", "百", "十", ""];

/// Largest value written with Chinese numerals. Beyond that, Arabic digits.
pub const MAX_NUMERAL: u32 = 99_999_999;

/// Render `n` in Chinese numerals.
///
/// `10..=19` use the short form (十二, not 一十二), inner zeros collapse to a
/// single 〇 (一百〇五), and values from ten thousand up are grouped by 万.
/// Negative numbers get a 负 prefix. Magnitudes above [`MAX_NUMERAL`] fall
/// back to Arabic digits.
pub fn to_chinese_numeral(n: i64) -> String {
    let magnitude = n.unsigned_abs();
    if magnitude > u64::from(MAX_NUMERAL) {
        return n.to_string();
    }

    let mut out = String::new();
    if n < 0 {
        out.push('负');
    }
    if magnitude == 0 {
        out.push(DIGITS[0]);
        return out;
    }

    let magnitude = magnitude as u32;
    let high = magnitude / 10_000;
    let low = magnitude % 10_000;

    if high > 0 {
        write_section(&mut out, high, true);
        out.push('万');
        if low > 0 {
            if low < 1_000 {
                out.push(DIGITS[0]);
            }
            write_section(&mut out, low, false);
        }
    } else {
        write_section(&mut out, low, true);
    }
    out
}

/// Label for a generation number: `第{numeral}世`.
pub fn generation_label(generation: i32) -> String {
    format!("第{}世", to_chinese_numeral(i64::from(generation)))
}

/// Write a section in `1..=9999`. Leading zeros are skipped, inner runs of
/// zeros become one 〇, trailing zeros vanish.
fn write_section(out: &mut String, section: u32, leading: bool) {
    if leading && (10..=19).contains(&section) {
        out.push('十');
        if section > 10 {
            out.push(DIGITS[(section - 10) as usize]);
        }
        return;
    }

    let digits = [
        section / 1_000,
        section / 100 % 10,
        section / 10 % 10,
        section % 10,
    ];
    let mut started = false;
    let mut pending_zero = false;
    for (digit, unit) in digits.into_iter().zip(UNITS) {
        if digit == 0 {
            pending_zero |= started;
            continue;
        }
        if pending_zero {
            out.push(DIGITS[0]);
            pending_zero = false;
        }
        out.push(DIGITS[digit as usize]);
        out.push_str(unit);
        started = true;
    }
}
