//! POSIX permission rendering.

/// `rwx` strings indexed by a 3-bit permission value.
pub const PERMISSION_STRINGS: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];

/// Sticky bit within the permission word.
pub const STICKY_BIT: u32 = 0o1000;

/// Renders a 3-bit permission value; higher bits are ignored.
pub fn rwx(bits: u32) -> &'static str {
    PERMISSION_STRINGS[(bits & 0o7) as usize]
}

/// `ls -l` style mode: type character plus owner, group and other triplets.
/// The sticky bit shows as `t` (other-execute set) or `T` in the last slot.
pub fn mode_string(type_char: char, perm: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(type_char);
    out.push_str(rwx(perm >> 6));
    out.push_str(rwx(perm >> 3));
    let other = rwx(perm);
    if perm & STICKY_BIT != 0 {
        out.push_str(&other[..2]);
        out.push(if perm & 0o1 != 0 { 't' } else { 'T' });
    } else {
        out.push_str(other);
    }
    out
}
