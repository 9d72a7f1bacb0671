//! Deterministic avatar selection
//!
//! The same identifier always maps to the same image of a fixed pool.

/// Pool used for student and class cards
pub const PROFILE_AVATAR_IMAGES: [&str; 3] = ["/perfil1.png", "/perfil2.png", "/perfil3.png"];

/// Pool used on the student page header
pub const STUDENT_PAGE_IMAGES: [&str; 4] = ["/pfb.png", "/pfp.png", "/pfy.png", "/pfby.png"];

/// Index into a pool of `pool_size` images.
///
/// Running sum of the identifier's UTF-16 code units, reduced modulo the pool
/// size at every step. Empty identifiers and empty pools map to 0.
pub fn pool_index(identifier: &str, pool_size: usize) -> usize {
    if identifier.is_empty() || pool_size == 0 {
        return 0;
    }
    identifier
        .encode_utf16()
        .fold(0usize, |hash, unit| (hash + usize::from(unit)) % pool_size)
}

pub fn select_profile_avatar(identifier: &str) -> &'static str {
    PROFILE_AVATAR_IMAGES[pool_index(identifier, PROFILE_AVATAR_IMAGES.len())]
}

pub fn select_turma_avatar(identifier: &str) -> &'static str {
    select_profile_avatar(identifier)
}

pub fn select_student_image(identifier: &str) -> &'static str {
    STUDENT_PAGE_IMAGES[pool_index(identifier, STUDENT_PAGE_IMAGES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_same_avatar() {
        let id = "3f2b6c1e-9a0d-4c1f-8e22-0b5e7d9a1c44";
        assert_eq!(select_profile_avatar(id), select_profile_avatar(id));
        assert_eq!(select_student_image(id), select_student_image(id));
    }

    #[test]
    fn test_empty_id_uses_first_image() {
        assert_eq!(select_profile_avatar(""), "/perfil1.png");
        assert_eq!(select_student_image(""), "/pfb.png");
    }

    #[test]
    fn test_index_is_char_code_sum_mod_pool() {
        // 'a' = 97, 'b' = 98 -> 195 % 3 = 0, 195 % 4 = 3
        assert_eq!(pool_index("ab", 3), 0);
        assert_eq!(pool_index("ab", 4), 3);
        // '7' = 55 -> 55 % 3 = 1
        assert_eq!(select_profile_avatar("7"), "/perfil2.png");
    }

    #[test]
    fn test_index_always_within_pool() {
        for id in ["x", "turma-42", "ção", "🙂", "0000"] {
            assert!(pool_index(id, 3) < 3);
            assert!(pool_index(id, 4) < 4);
        }
    }

    #[test]
    fn test_empty_pool() {
        assert_eq!(pool_index("abc", 0), 0);
    }

    #[test]
    fn test_turma_avatar_matches_profile_avatar() {
        assert_eq!(select_turma_avatar("t-1"), select_profile_avatar("t-1"));
    }
}
