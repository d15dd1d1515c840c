/*!

This is the long-form manual for `survey_items` and `survey-digest`.

## Input format

The program reads the export of a "hot" survey (a satisfaction survey filled in right
after a training session). The export is a CSV file separated with semicolons (`;`).
UTF-8 is expected. Files saved by older spreadsheet programs in latin-1 are also
accepted: when the content is not valid UTF-8, it is read again as latin-1.

The first line gives the names of the columns. The columns are read by position:

| columns        | content                                                    |
|----------------|------------------------------------------------------------|
| `A`, `B`       | identity of the respondent, always ignored                 |
| `C` to `AZ`    | the items of the survey                                    |
| `BO`, `BQ`, `BS` | three open questions                                     |

The last line of the file is not a respondent: it holds the totals computed by the
survey tool ("Les Oui"). It is used for the counts of the items and it is never read
for comments or answers to open questions.

A file with 2 columns or less is rejected. A file narrower than expected is fine: the
item block stops at the last column, and the open questions that do not exist are
skipped.

### Items

The name of an item column has the form `<item label>.<modality>`, split on the last
`.`. All the columns with the same item label make one item, in the order of their
first appearance.

```text
id;tech;Accueil.Très satisfait;Accueil.Satisfait;Accueil.Commentaire;Durée.Trop court;Durée.Adaptée
1;x;1;;Très bon accueil;;1
2;y;;1;;1;
;;1;1;;1;1
```

- a modality containing `Commentaire` (in any case) is a free-text column: its
  non-empty cells are the comments of the item.
- any other modality is counted: its count is the value in the totals row. A cell that
  is not a number counts as zero.
- a column name without `.` is an item with a single, unnamed modality.

The percentages are computed per item from the sum of its counts and rounded to one
decimal. They are rounded independently and may not add up to exactly 100. An item
with a total of zero has no distribution.

When all the modalities of an item belong to the satisfaction scale
(`Très satisfait`, `Satisfait`, `Peu satisfait`, `Pas du tout satisfait`), they are
displayed in this order with fixed colors. Other modalities keep the order of the
columns and receive colors from a categorical palette.

### Open questions

The open questions are read from the full table, independently of the item block.
Their label is the name of the column without the `.Commentaire` suffix (or the text
before the first `.` if the suffix is missing).

## Configuration

`survey-digest` uses the layout above by default. A configuration file in JSON can
change it:

```json
{
  "outputSettings": {
    "sessionNumber": "2024-17",
    "sessionDate": "2024-03-12",
    "sessionLabel": "Formation gestes et postures",
    "outputDirectory": "reports"
  },
  "fileSource": {
    "provider": "csv",
    "filePath": "export_evento.csv",
    "firstItemColumn": "C",
    "lastItemColumn": "AZ",
    "openQuestionColumns": ["BO", "BQ", "BS"],
    "delimiter": ";"
  }
}
```

Columns are given either with their letters in the spreadsheet (`"C"`, `"AZ"`) or with
their number, starting at 1 to respect the conventions of the spreadsheet world
(`3` is column `C`). The item block includes both its first and its last column.

Options for `fileSource`:
 - `provider` (`csv` or `xlsx`, default `csv`)
 - `filePath`: relative to the directory of the configuration file
 - `excelWorksheetName` (string, optional): for Excel inputs, the name of the
   worksheet. The first worksheet is used otherwise.

The positions of the open questions are tied to one layout of the export. They are not
checked against the item block, so the report lists warnings when one of them is
missing, overlaps the items or does not look like a comment column.

 */
