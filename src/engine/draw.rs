//! 加权随机抽取
//!
//! 权重使用 basis points (bp)，100% = 10000bp。抽取时以当前权重之和 `T`
//! 为分母：在 `1..=T` 内取随机数 `r`，按 id 顺序依次减去各物品权重，
//! 第一个使 `r <= 0` 的物品即为结果；若遍历结束仍未命中则回退到第一个物品。

use crate::entities::box_item_entity as items;
use crate::error::{AppError, AppResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// 100% 对应的权重
pub const FULL_WEIGHT: i64 = 10_000;

/// 百分比 (最多两位小数) 转换为 bp，超出 `[0, 100]` 视为校验错误
pub fn percent_to_weight(percent: f64) -> AppResult<i32> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(AppError::ValidationError(
            "Item probability must be between 0% and 100%".to_string(),
        ));
    }
    Ok((percent * 100.0).round() as i32)
}

pub fn weight_to_percent(weight: i32) -> f64 {
    f64::from(weight) / 100.0
}

/// 随机数来源，返回 `1..=upper` 内均匀分布的整数
pub trait Roller: Send + Sync {
    fn roll(&self, upper: i64) -> i64;
}

/// 线程本地随机数发生器
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRoller;

impl Roller for ThreadRoller {
    fn roll(&self, upper: i64) -> i64 {
        rand::thread_rng().gen_range(1..=upper)
    }
}

/// 固定种子的发生器，结果可复现
pub struct SeededRoller {
    rng: Mutex<StdRng>,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Roller for SeededRoller {
    fn roll(&self, upper: i64) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(1..=upper)
    }
}

/// 可参与抽取的对象
pub trait Weighted {
    fn weight(&self) -> i64;
}

impl Weighted for items::Model {
    fn weight(&self) -> i64 {
        i64::from(self.probability_bp)
    }
}

pub fn total_weight<T: Weighted>(pool: &[T]) -> i64 {
    pool.iter().map(|w| w.weight().max(0)).sum()
}

/// 从物品池中抽取一个。池为空或总权重为 0 时返回 None。
pub fn pick<'a, T: Weighted>(pool: &'a [T], roller: &dyn Roller) -> Option<&'a T> {
    let first = pool.first()?;
    let total = total_weight(pool);
    if total <= 0 {
        return None;
    }

    let mut remaining = roller.roll(total);
    for candidate in pool {
        remaining -= candidate.weight().max(0);
        if remaining <= 0 {
            return Some(candidate);
        }
    }
    Some(first)
}

/// 校验新增/修改物品后的概率之和不超过 100%
///
/// `others_total` 为同一盲盒内其它物品的权重之和 (修改时不含自身)。
pub fn ensure_within_budget(others_total: i64, weight: i64) -> AppResult<()> {
    if !(0..=FULL_WEIGHT).contains(&weight) {
        return Err(AppError::ValidationError(
            "Item probability must be between 0% and 100%".to_string(),
        ));
    }
    if others_total + weight > FULL_WEIGHT {
        return Err(AppError::ValidationError(format!(
            "Total probability would exceed 100% ({}.{:02}% already allocated)",
            others_total / 100,
            others_total % 100
        )));
    }
    Ok(())
}
