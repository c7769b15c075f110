/// Id that receives focus after `current`, given the highest assigned id.
///
/// Ids start at 1 and `current` = 0 means nothing is focused. At or past
/// `max_id` the cycle wraps to 1. Assumes dense ids.
pub fn next_focus_id(current: u16, max_id: u16) -> u16 {
    if current >= max_id {
        1
    } else {
        current + 1
    }
}
