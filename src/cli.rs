use bin_verify_common::MatchPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bin-verify")]
#[command(about = "ビン画像と期待品目リストを照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ビン画像を解析して期待品目と照合
    Analyze {
        /// ビン画像のパス
        #[arg(required = true)]
        image: PathBuf,

        /// 期待品目ファイル（1行1件: "品名 数量"）
        #[arg(short, long)]
        items: Option<PathBuf>,

        /// 期待品目を直接指定（例: --item "Blue Widget 3"）
        #[arg(long = "item")]
        item: Vec<String>,

        /// 保存済みの検出結果JSON（指定時は検出サービスを呼ばない）
        #[arg(short, long)]
        detections: Option<PathBuf>,

        /// 検出エンドポイント（設定値より優先）
        #[arg(short, long)]
        endpoint: Option<String>,

        /// 照合ポリシー (exact/substring)
        #[arg(long)]
        policy: Option<MatchPolicy>,

        /// 信頼度の閾値（この値を超えたものを採用）
        #[arg(long)]
        threshold: Option<f64>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 結果をJSONで標準出力に表示
        #[arg(long)]
        json: bool,
    },

    /// 期待品目ファイルを読み込んで内容を表示
    Parse {
        /// 期待品目ファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 商品カタログを検索
    Search {
        /// 検索語（部分一致、大文字小文字無視）
        #[arg(required = true)]
        query: String,

        /// 商品名カタログ（省略時は設定値または ./unique_product_names.txt）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 最大表示件数
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// 検索結果から1件選んで数量を入力
        #[arg(long)]
        pick: bool,

        /// 選んだ品目を追記する期待品目ファイル
        #[arg(long, requires = "pick")]
        append: Option<PathBuf>,
    },

    /// 検出リレーサーバーを起動
    Serve {
        /// 待受ポート（省略時は設定値）
        #[arg(short, long)]
        port: Option<u16>,

        /// 転送先のモデルサービスURL（省略時は MODEL_API_URL または設定値）
        #[arg(long)]
        model_url: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 検出エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 商品名カタログのパスを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
