//! 渲染线程和离屏快照
//!
//! 显示节点的快照必须在单一渲染线程上执行；纯缓冲区变换不经过
//! 这里，可以在任意线程运行。Renderer 持有渲染线程的任务队列，
//! snapshot 提交闭包后阻塞，直到渲染线程填充完缓冲区并应答。
//! 这条同步握手没有超时，也没有取消：渲染线程挂起则调用方挂起。

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, bounded, unbounded};

use crate::buffer::PixelBuffer;
use crate::display::{SnapshotParams, SnapshotSource};
use crate::error::{Result, TextureError};

/// 渲染线程任务
type RenderTask = Box<dyn FnOnce() + Send>;

/// 单线程渲染器
///
/// Drop 时关闭任务队列并等待渲染线程排空退出。
pub struct Renderer {
    sender: Option<Sender<RenderTask>>,
    handle: Option<JoinHandle<()>>,
}

impl Renderer {
    /// 启动渲染线程
    pub fn new() -> Self {
        let (sender, receiver) = unbounded::<RenderTask>();

        let handle = thread::spawn(move || {
            tracing::info!("渲染线程启动");
            while let Ok(task) = receiver.recv() {
                task();
            }
            tracing::info!("渲染线程退出");
        });

        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// 在渲染线程上执行闭包，阻塞等待返回值
    pub fn run<T, F>(&self, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or(TextureError::RenderThreadClosed)?;

        let (reply_tx, reply_rx) = bounded(1);
        let boxed: RenderTask = Box::new(move || {
            // 调用方提前放弃应答通道时丢弃结果
            let _ = reply_tx.send(task());
        });

        sender
            .send(boxed)
            .map_err(|_| TextureError::RenderThreadClosed)?;
        reply_rx.recv().map_err(|_| TextureError::RenderThreadClosed)
    }

    /// 把显示节点离屏快照为像素缓冲区
    ///
    /// 在渲染线程上以填充色准备目标缓冲区并让节点绘制自身；
    /// 调用线程阻塞到缓冲区就绪。
    pub fn snapshot(
        &self,
        source: Arc<dyn SnapshotSource>,
        params: SnapshotParams,
    ) -> Result<PixelBuffer> {
        tracing::debug!("提交快照任务: {}x{}", params.width, params.height);

        self.run(move || {
            let mut buffer = PixelBuffer::filled(params.width, params.height, params.fill);
            let mut writer = buffer.writer();
            source.render_into(&mut writer);
            buffer
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // 关闭队列，渲染线程排空后退出
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
