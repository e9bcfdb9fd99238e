use rand::Rng;

/// 生成指定位数的纯数字验证码（允许前导 0）
pub fn generate_numeric_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
