/*!

This is the long-form manual for `egov_index` and `egovdash`.

## Input formats

A dataset is a table with one row per country and year. Only three columns
are read, located by their name in the first row; any other column is ignored.

The following providers are supported:
* `csv` Comma Separated Values with a header row
* `xlsx` Excel workbook; the worksheet is given by `excelWorksheetName`, or the
  workbook must contain exactly one worksheet

### `csv`

```text
English name,Year,UN eGov index
Denmark,2020,0.9758
Republic of Korea,2020,0.9560
Estonia,2020,0.9473
Denmark,2018,0.9150
```

Rows with an empty index value are skipped (there is nothing to rank or to draw
for them). A year or a value that cannot be read stops the program with the
line number of the offending row.

## Ranking

The rows of the selected year are sorted by decreasing value. The rank uses
the competition rule: countries with the same value share the lowest rank of
their group, and the next country gets `1 + the number of countries with a
strictly greater value`:

| Country | Value | Rank | Percentile |
|---------|-------|------|------------|
| A       | 0.9   | 1    | 100.0%     |
| B       | 0.9   | 1    | 100.0%     |
| C       | 0.5   | 3    | 33.3%      |

The percentile is the share of countries with a value lower than or equal to
the one of the row, rounded to one decimal (halves go to the even digit:
`6.25` reads `6.2%`). With `"percentileMethod":
"average"`, ties instead get the average of the positions they occupy (A and B
would both read `83.3%` above).

## Configuration

Without `--config`, `egovdash` shows the UN index (`data/eGov-t5.csv`, world map)
and the EU index (`data/eur-t3.csv`, map of Europe). A configuration file
describes the panels explicitly:

```json
{
  "dataDirectory": "data",
  "topN": 15,
  "panels": [
    {
      "id": "eu",
      "title": "EU eGovernment index",
      "provider": "csv",
      "filePath": "eur-t3.csv",
      "countryColumn": "English name",
      "yearColumn": "Year",
      "valueColumn": "EU eGov index",
      "valueLabel": "EU index value",
      "mapScope": "europe"
    }
  ]
}
```

## Output

The summary is a JSON document with one entry per panel: the slider, the
selected year, the title, the table of the best countries and the map data. With
`--figures`, a Plotly choropleth figure is written for every panel. The figure
only describes the data; drawing it is left to Plotly.

*/
