//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageResizer` 负责流程编排与配置管理，不绑定具体画布实现。
//! 单个文件的处理链路固定为：
//! 1. 校验声明类型
//! 2. 读取原始字节
//! 3. 解码位图（临时引用在解码后释放）
//! 4. 计算目标尺寸并重绘、编码、打包
//!
//! ## 实现思路
//!
//! - 配置存于 `RwLock`，每个批次取一次快照并以 `Arc` 只读共享。
//! - 每个文件一个 `JoinSet` 任务，结果按输入下标回填，保证顺序。
//! - 任一任务失败立即返回该错误；其余任务不取消，`detach_all` 后自行结束，结果被忽略。
//! - 记录 `load/decode/render/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::task::JoinSet;

use super::dimensions::compute_target_dimensions;
use super::encoder::encode_data_url;
use super::loader::{BlobRegistry, decode_bitmap, read_input_bytes};
use super::packager::package;
use super::validator::ensure_image_input;
use super::{
    Dimensions, EncodedResult, ImageInput, RasterSurface, ResizeConfig, ResizeError, ScalingSurfaceProvider,
    SurfaceProvider,
};

/// 批量缩放器。
///
/// 持有配置与画布提供者，可跨批次复用。
pub struct ImageResizer<P: SurfaceProvider = ScalingSurfaceProvider> {
    config: RwLock<ResizeConfig>,
    provider: Arc<P>,
    blobs: BlobRegistry,
}

impl ImageResizer<ScalingSurfaceProvider> {
    /// 使用默认画布提供者，滤镜取自配置。
    ///
    /// # 示例
    /// ```rust
    /// use image_resizer::{ImageResizer, ResizeConfig};
    ///
    /// let resizer = ImageResizer::new(ResizeConfig::default())?;
    /// assert_eq!(resizer.config_snapshot()?.max_width, 1920);
    /// # Ok::<(), image_resizer::ResizeError>(())
    /// ```
    pub fn new(config: ResizeConfig) -> Result<Self, ResizeError> {
        let provider = ScalingSurfaceProvider::new(config.resize_filter);
        Self::with_provider(config, provider)
    }
}

impl<P: SurfaceProvider> ImageResizer<P> {
    /// 注入自定义画布提供者。
    pub fn with_provider(config: ResizeConfig, provider: P) -> Result<Self, ResizeError> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(config),
            provider: Arc::new(provider),
            blobs: BlobRegistry::default(),
        })
    }

    /// 读取当前配置快照。
    pub fn config_snapshot(&self) -> Result<ResizeConfig, ResizeError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ResizeError::InvalidConfig("配置读取锁已中毒".to_string()))
    }

    /// 替换配置，只影响之后开始的批次。
    pub fn set_config(&self, config: ResizeConfig) -> Result<(), ResizeError> {
        config.validate()?;
        let mut current = self
            .config
            .write()
            .map_err(|_| ResizeError::InvalidConfig("配置写入锁已中毒".to_string()))?;
        *current = config;
        Ok(())
    }

    /// 尚未释放的临时字节引用数量。
    pub fn live_blob_count(&self) -> usize {
        self.blobs.live_count()
    }

    /// 批处理主入口：结果顺序与输入一致，任一失败即整体失败。
    pub async fn resize_batch(&self, files: Vec<ImageInput>) -> Result<Vec<EncodedResult>, ResizeError> {
        let config = Arc::new(self.config_snapshot()?);
        self.run_batch(files, config).await
    }

    /// 以指定配置运行一个批次，不修改已保存的配置。
    pub async fn resize_batch_with(
        &self,
        files: Vec<ImageInput>,
        config: ResizeConfig,
    ) -> Result<Vec<EncodedResult>, ResizeError> {
        config.validate()?;
        self.run_batch(files, Arc::new(config)).await
    }

    async fn run_batch(
        &self,
        files: Vec<ImageInput>,
        config: Arc<ResizeConfig>,
    ) -> Result<Vec<EncodedResult>, ResizeError> {
        let total = files.len();
        let batch_start = Instant::now();
        log::info!(
            "🖼️ 开始批量缩放 - 文件数: {} 上限: {}x{} 输出: {}",
            total,
            config.max_width,
            config.max_height,
            config.output_type
        );

        let mut tasks = JoinSet::new();
        for (index, input) in files.into_iter().enumerate() {
            let config = Arc::clone(&config);
            let provider = Arc::clone(&self.provider);
            let blobs = self.blobs.clone();
            tasks.spawn(async move {
                let result = process_file_with(&input, &config, provider, &blobs).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<EncodedResult>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| ResizeError::Task(e.to_string()))
                .and_then(|(index, result)| result.map(|encoded| (index, encoded)));
            match outcome {
                Ok((index, encoded)) => results[index] = Some(encoded),
                Err(err) => {
                    // 其余任务继续运行，结果不再收集。
                    tasks.detach_all();
                    return Err(err);
                }
            }
        }

        log::info!(
            "✅ 批量缩放完成 - 文件数: {} total={}ms",
            total,
            batch_start.elapsed().as_millis()
        );

        results
            .into_iter()
            .map(|slot| slot.ok_or_else(|| ResizeError::Task("任务结果缺失".to_string())))
            .collect()
    }

    /// 处理单个文件。
    pub async fn process_file(&self, input: &ImageInput) -> Result<EncodedResult, ResizeError> {
        let config = self.config_snapshot()?;
        process_file_with(input, &config, Arc::clone(&self.provider), &self.blobs).await
    }
}

async fn process_file_with<P: SurfaceProvider>(
    input: &ImageInput,
    config: &ResizeConfig,
    provider: Arc<P>,
    blobs: &BlobRegistry,
) -> Result<EncodedResult, ResizeError> {
    ensure_image_input(input)?;

    let load_start = Instant::now();
    let bytes = read_input_bytes(input, config).await?;
    let load_elapsed = load_start.elapsed();

    let decode_start = Instant::now();
    let bitmap = decode_bitmap(blobs.register(bytes), &input.name, config.max_decoded_pixels).await?;
    let decode_elapsed = decode_start.elapsed();

    let original = Dimensions::new(bitmap.width(), bitmap.height());
    let target = compute_target_dimensions(original, config.max_width, config.max_height);

    let render_start = Instant::now();
    let quality = config.jpeg_quality();
    let output_type = config.output_type.clone();
    let file_name = input.name.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut surface = provider.allocate(target)?;
        surface.draw_scaled(&bitmap)?;
        drop(bitmap);
        let data_url = encode_data_url(&surface, quality)?;
        drop(surface);
        package(data_url, &output_type, &file_name)
    })
    .await
    .map_err(|e| ResizeError::Render(format!("文件 {} 渲染线程执行失败：{}", input.name, e)))??;
    let render_elapsed = render_start.elapsed();

    log::debug!(
        "✅ 文件 {} 完成 - {}x{} -> {}x{} load={}ms decode={}ms render={}ms",
        input.name,
        original.width,
        original.height,
        target.width,
        target.height,
        load_elapsed.as_millis(),
        decode_elapsed.as_millis(),
        render_elapsed.as_millis()
    );

    Ok(result)
}

/// 使用默认配置（或给定配置）批量缩放。
///
/// # 示例
/// ```rust,no_run
/// use image_resizer::{ImageInput, resize_images};
///
/// # async fn demo(png: Vec<u8>) -> Result<(), image_resizer::ResizeError> {
/// let results = resize_images(vec![ImageInput::new("a.png", "image/png", png)], None).await?;
/// assert!(results[0].as_data_url().is_some());
/// # Ok(())
/// # }
/// ```
pub async fn resize_images(
    files: Vec<ImageInput>,
    options: Option<ResizeConfig>,
) -> Result<Vec<EncodedResult>, ResizeError> {
    let resizer = ImageResizer::new(options.unwrap_or_default())?;
    resizer.resize_batch(files).await
}
