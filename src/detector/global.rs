//! 全局检测器单例管理
//! 核心职责：
//! 1. 维护进程生命周期内唯一的SerpDetector实例
//! 2. 支持懒加载初始化（默认配置：内置规则）和手动注入规则表
//! 3. 统一错误处理和状态管理

use once_cell::sync::OnceCell;
use serpextract_engine::RawRuleTable;

use super::detector::SerpDetector;
use crate::error::{SerpError, SerpResult};
use crate::RuleConfig;

/// 全局检测器实例 - 线程安全单例，进程内仅初始化一次
static GLOBAL_DETECTOR: OnceCell<SerpDetector> = OnceCell::new();

/// 初始化全局检测器
/// 幂等：已初始化则直接返回Ok(())，先到者生效
pub fn init_global_detector(config: RuleConfig) -> SerpResult<()> {
    if GLOBAL_DETECTOR.get().is_some() {
        log::debug!("Global detector already initialized, skip reinitialization");
        return Ok(());
    }

    let detector = SerpDetector::new(config).map_err(|e| {
        SerpError::DetectorInitError(format!("Failed to create SerpDetector instance: {}", e))
    })?;
    install(detector);

    log::info!("Global SerpDetector initialized successfully");
    Ok(())
}

/// 手动注入规则表，初始化全局检测器
/// 适用场景：预加载或自行组装规则表后初始化
pub fn init_global_detector_with_rules(table: &RawRuleTable, config: RuleConfig) -> SerpResult<()> {
    if GLOBAL_DETECTOR.get().is_some() {
        log::debug!("Global detector already initialized, skip reinitialization with custom rules");
        return Ok(());
    }

    install(SerpDetector::with_rules(table, config));

    log::info!("Global SerpDetector initialized with custom rule table");
    Ok(())
}

/// 并发初始化时只有一个实例能写入；落败方视为已初始化
fn install(detector: SerpDetector) {
    if GLOBAL_DETECTOR.set(detector).is_err() {
        log::debug!("Global detector initialized concurrently by another thread, discard local instance");
    }
}

/// 获取全局检测器实例（自动懒加载）
/// 未初始化则使用默认配置初始化
pub(crate) fn get_global_detector() -> SerpResult<&'static SerpDetector> {
    GLOBAL_DETECTOR.get_or_try_init(|| {
        log::debug!("Lazy initializing global SerpDetector with default config");
        SerpDetector::new(RuleConfig::default()).map_err(|e| {
            SerpError::DetectorInitError(format!("Failed to create SerpDetector instance: {}", e))
        })
    })
}
