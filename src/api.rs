//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;

/// 入力ワークブック内で認識されるシートの種類
///
/// シート名は固定です（`markers`, `lines`, `polygons`, `circles`, `heatmap`）。
/// 各シートは1種類のジオメトリのみを保持し、地図上では1つのレイヤーになります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetKind {
    /// 地点マーカー（クラスタリング対象）
    Markers,
    /// ポリゴン（閉じたリング）
    Polygons,
    /// 半径付きの円
    Circles,
    /// ヒートマップの点
    Heatmap,
    /// ポリライン
    Lines,
}

impl SheetKind {
    /// すべてのシート種別（描画順）
    ///
    /// 後に追加されたレイヤーほど上に描画されます。
    pub const ALL: [SheetKind; 5] = [
        SheetKind::Markers,
        SheetKind::Polygons,
        SheetKind::Circles,
        SheetKind::Heatmap,
        SheetKind::Lines,
    ];

    /// ワークブック内のシート名
    pub fn sheet_name(self) -> &'static str {
        match self {
            SheetKind::Markers => "markers",
            SheetKind::Polygons => "polygons",
            SheetKind::Circles => "circles",
            SheetKind::Heatmap => "heatmap",
            SheetKind::Lines => "lines",
        }
    }

    /// レイヤー切り替えコントロールに表示するラベル
    pub fn label(self) -> &'static str {
        match self {
            SheetKind::Markers => "Markers",
            SheetKind::Polygons => "Polygons",
            SheetKind::Circles => "Circles",
            SheetKind::Heatmap => "Heatmap",
            SheetKind::Lines => "Lines",
        }
    }

    /// シート名から種別を判定する（完全一致）
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.sheet_name() == name)
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// ベースマップのタイルスタイル
///
/// レイヤー切り替えコントロールのベースレイヤーとして追加されます。
/// リストの先頭が初期表示になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TileStyle {
    /// OpenStreetMap標準タイル
    OpenStreetMap,
    /// CartoDB Positron（ライトモード）
    CartoDbPositron,
    /// CartoDB Dark Matter（ダークモード）
    CartoDbDarkMatter,
}

impl TileStyle {
    /// デフォルトのタイル構成
    pub const DEFAULTS: [TileStyle; 3] = [
        TileStyle::OpenStreetMap,
        TileStyle::CartoDbPositron,
        TileStyle::CartoDbDarkMatter,
    ];

    /// レイヤー切り替えコントロールに表示する名前
    pub fn label(self) -> &'static str {
        match self {
            TileStyle::OpenStreetMap => "OpenStreetMap",
            TileStyle::CartoDbPositron => "Light Mode",
            TileStyle::CartoDbDarkMatter => "Dark Mode",
        }
    }

    /// Leaflet形式のタイルURLテンプレート
    pub fn url_template(self) -> &'static str {
        match self {
            TileStyle::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            TileStyle::CartoDbPositron => {
                "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png"
            }
            TileStyle::CartoDbDarkMatter => {
                "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png"
            }
        }
    }

    /// タイル提供元の帰属表示（HTML）
    pub fn attribution(self) -> &'static str {
        match self {
            TileStyle::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            TileStyle::CartoDbPositron | TileStyle::CartoDbDarkMatter => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
        }
    }

    /// サブドメイン（`{s}`の置換候補）
    pub fn subdomains(self) -> &'static str {
        match self {
            TileStyle::OpenStreetMap => "abc",
            TileStyle::CartoDbPositron | TileStyle::CartoDbDarkMatter => "abcd",
        }
    }

    /// 最大ズームレベル
    pub fn max_zoom(self) -> u8 {
        match self {
            TileStyle::OpenStreetMap => 19,
            TileStyle::CartoDbPositron | TileStyle::CartoDbDarkMatter => 20,
        }
    }
}

/// ポリゴンのリングが閉じていない場合の処理方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum PolygonClosure {
    /// 先頭の点を末尾に追加してリングを閉じる（デフォルト）
    #[default]
    AutoClose,

    /// 閉じていないリングを持つ行をスキップする
    Reject,
}

/// 出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Leafletを使ったスタンドアロンHTML（デフォルト）
    #[default]
    Html,

    /// GeoJSON FeatureCollection
    ///
    /// 座標は`[経度, 緯度]`の順で出力されます。
    GeoJson,
}
